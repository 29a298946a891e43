pub mod models;
pub mod services;
pub mod api;

use api::{check_transcription, detect_file, load_config, parse_chat_log, scan_messages};
use services::config_store::ConfigStore;

use anyhow::{bail, Context};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

static PROCESS_START: OnceLock<Instant> = OnceLock::new();
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const USAGE: &str = "Usage:
  schoolhub analyze <report.(txt|md|docx|pdf)> [--paragraphs]
  schoolhub verify <reference.txt> <transcript.txt> [--threshold <0-1>]
  schoolhub scan <chat_log.tsv> [--threshold <n>]

Output is JSON on stdout. Logs go to SCHOOLHUB_LOG_DIR (or the platform data dir).";

fn startup_elapsed_ms() -> u128 {
    PROCESS_START
        .get()
        .map(|t| t.elapsed().as_millis())
        .unwrap_or(0)
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}

/// Initialize logging system with timestamped log files
pub fn init_logging(keep_files: usize) {
    let disable_file_log = env_flag("SCHOOLHUB_DISABLE_FILE_LOG");
    let disable_cleanup = env_flag("SCHOOLHUB_DISABLE_LOG_CLEANUP");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if disable_file_log {
        init_console_only_logging(env_filter);
        info!("File logging disabled via SCHOOLHUB_DISABLE_FILE_LOG");
        return;
    }

    let logs_dir = match std::env::var("SCHOOLHUB_LOG_DIR") {
        Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => get_logs_dir(),
    };

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Failed to create logs directory: {}", e);
        init_console_only_logging(env_filter);
        info!("Falling back to console-only logging (log dir not writable)");
        return;
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("schoolhub_{}.log", timestamp);

    // One file per session; writes stay off the calling thread.
    let file_appender = rolling::never(&logs_dir, &log_filename);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(file_guard);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    // stdout carries command output, so the console layer writes to stderr.
    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .init();
    }

    info!(log_file = %logs_dir.join(&log_filename).display(), version = env!("CARGO_PKG_VERSION"), "logging.started");

    if !disable_cleanup {
        std::thread::spawn(move || {
            cleanup_old_logs(&logs_dir, keep_files);
        });
    }
}

fn get_logs_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("logs")
    }

    #[cfg(not(debug_assertions))]
    {
        if let Some(data_dir) = dirs::data_local_dir() {
            return data_dir.join("schoolhub").join("logs");
        }
        PathBuf::from("logs")
    }
}

fn cleanup_old_logs(logs_dir: &Path, keep: usize) {
    let mut entries: Vec<_> = match fs::read_dir(logs_dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).collect(),
        Err(_) => return,
    };

    entries.retain(|e| {
        let name = e.file_name().to_string_lossy().to_string();
        name.starts_with("schoolhub_") && name.ends_with(".log")
    });

    if entries.len() <= keep {
        return;
    }

    entries.sort_by_key(|e| {
        e.metadata()
            .and_then(|m| m.modified())
            .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
    });

    let remove_count = entries.len().saturating_sub(keep);
    for entry in entries.into_iter().take(remove_count) {
        let _ = fs::remove_file(entry.path());
    }
}

fn init_console_only_logging(env_filter: EnvFilter) {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions))
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

pub fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

pub fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

fn read_text(path: &str) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {} failed", path))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Entry point for the `schoolhub` binary.
pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    PROCESS_START.get_or_init(Instant::now);

    let (config, config_err) = load_config(ConfigStore::open_default().as_ref());
    init_logging(config.logging.keep_files);
    if let Some(e) = config_err {
        warn!(error = %e, "config.load_failed_using_defaults");
    }
    info!(startup_ms = startup_elapsed_ms(), "logging.initialized");

    let Some(command) = args.get(1).map(String::as_str) else {
        eprintln!("{}", USAGE);
        return Ok(());
    };

    match command {
        "analyze" => {
            let path = args.get(2).context("missing report path")?;
            let detection = detect_file(Path::new(path)).map_err(anyhow::Error::msg)?;
            if has_flag(&args, "--paragraphs") {
                print_json(&detection)?;
            } else {
                print_json(&detection.overall)?;
            }
        }
        "verify" => {
            let reference = read_text(args.get(2).context("missing reference path")?)?;
            let transcript = read_text(args.get(3).context("missing transcript path")?)?;
            let threshold = match parse_arg_value(&args, "--threshold") {
                Some(v) => Some(v.parse::<f64>().with_context(|| format!("invalid threshold {}", v))?),
                None => None,
            };
            print_json(&check_transcription(&reference, &transcript, threshold))?;
        }
        "scan" => {
            let log = read_text(args.get(2).context("missing chat log path")?)?;
            let threshold = match parse_arg_value(&args, "--threshold") {
                Some(v) => Some(v.parse::<u32>().with_context(|| format!("invalid threshold {}", v))?),
                None => None,
            };
            let alerts = scan_messages(&parse_chat_log(&log), threshold);
            info!(alerts = alerts.len(), "scan.completed");
            print_json(&alerts)?;
        }
        "-h" | "--help" | "help" => eprintln!("{}", USAGE),
        other => bail!("unknown command: {}\n\n{}", other, USAGE),
    }

    info!(elapsed_ms = startup_elapsed_ms(), "=== SchoolHub Exited ===");
    Ok(())
}
