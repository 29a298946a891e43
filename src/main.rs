fn main() -> anyhow::Result<()> {
    schoolhub_lib::run(std::env::args().collect())
}
