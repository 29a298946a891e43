use anyhow::Context;
use schoolhub_lib::api::{detect_file, DocumentDetection};
use schoolhub_lib::services::document_reader::DocumentKind;
use schoolhub_lib::services::text_processor::preview;
use schoolhub_lib::{has_flag, parse_arg_value};
use serde::Serialize;
use std::path::{Path, PathBuf};

fn collect_inputs(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(path)
        .with_context(|| format!("read dir {} failed", path.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .and_then(DocumentKind::from_file_name)
                .is_some()
        })
        .collect();
    files.sort();
    Ok(files)
}

fn print_detection(d: &DocumentDetection, show_paragraphs: bool, paragraphs_n: usize) {
    println!("File: {}", d.file);
    println!("Extracted: {} chars", d.chars);
    println!(
        "Score: {} ({} / {})",
        d.overall.score,
        d.overall.level.as_str(),
        d.overall.level.label_ko()
    );
    println!(
        "Details: ttr={:.2} avgLen={} stdDev={:.1} connectors={:.2} repetition={}",
        d.overall.details.ttr,
        d.overall.details.avg_sentence_length,
        d.overall.details.sentence_length_std_dev,
        d.overall.details.connector_ratio,
        d.overall.details.repetition_score
    );
    for ind in &d.overall.indicators {
        println!("  - {}", ind);
    }

    if show_paragraphs {
        for p in d.paragraphs.iter().take(paragraphs_n) {
            println!(
                "[P{:03}] bytes=[{},{}] score={:>3} {:<6}  {}",
                p.block.index,
                p.block.start,
                p.block.end,
                p.result.score,
                p.result.level.as_str(),
                preview(&p.block.text, 100)
            );
        }
        if d.paragraphs.len() > paragraphs_n {
            println!("... ({} more paragraphs)", d.paragraphs.len() - paragraphs_n);
        }
    }
    println!();
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage:\n  cargo run --bin analyze_report -- <file|dir> [--paragraphs] [--limit <n>] [--out <json_path>]\n\nNotes:\n  - A directory is scanned for .txt/.md/.docx/.pdf files (not recursive).\n  - `--paragraphs` also scores each blank-line separated paragraph."
        );
        return Ok(());
    }

    let input = PathBuf::from(&args[1]);
    let show_paragraphs = has_flag(&args, "--paragraphs");
    let paragraphs_n: usize = parse_arg_value(&args, "--limit")
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);
    let out_path = parse_arg_value(&args, "--out");

    let mut detections = Vec::new();
    let mut failures = Vec::new();
    for path in collect_inputs(&input)? {
        match detect_file(&path) {
            Ok(d) => {
                print_detection(&d, show_paragraphs, paragraphs_n);
                detections.push(d);
            }
            Err(e) => {
                eprintln!("Skipped {}: {}", path.display(), e);
                failures.push(Failure {
                    file: path.display().to_string(),
                    error: e,
                });
            }
        }
    }

    println!("Analyzed: {} file(s), skipped: {}", detections.len(), failures.len());

    if let Some(out_path) = out_path {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Output {
            input: String,
            reports: Vec<DocumentDetection>,
            failures: Vec<Failure>,
        }

        let out = Output {
            input: input.display().to_string(),
            reports: detections,
            failures,
        };

        let json = serde_json::to_string_pretty(&out)?;
        std::fs::write(&out_path, json).with_context(|| format!("write {} failed", out_path))?;
        println!("Wrote JSON: {}", out_path);
    }

    Ok(())
}

#[derive(Serialize)]
struct Failure {
    file: String,
    error: String,
}
