// Command surface
// String-error wrappers over the services, called by the CLI binaries

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::models::{AIDetectionResult, RiskAlert, TranscriptionCheck};
use crate::services::config_store::{AppConfig, ConfigError, ConfigStore};
use crate::services::detection::{analyze, verify_transcription, RiskMonitor};
use crate::services::document_reader::extract_text;
use crate::services::text_processor::{build_paragraph_blocks, estimate_tokens, TextBlock};

/// Load config from `store`, falling back to defaults. A load failure is
/// handed back so the caller can report it once logging is up.
pub fn load_config(store: Option<&ConfigStore>) -> (AppConfig, Option<ConfigError>) {
    match store.map(ConfigStore::load) {
        Some(Ok(cfg)) => (cfg, None),
        Some(Err(e)) => (AppConfig::default(), Some(e)),
        None => (AppConfig::default(), None),
    }
}

/// Config at the default location, falling back to defaults when unreadable.
pub fn get_config() -> AppConfig {
    let (config, err) = load_config(ConfigStore::open_default().as_ref());
    if let Some(e) = err {
        warn!(error = %e, "config.load_failed_using_defaults");
    }
    config
}

pub fn save_config(config: AppConfig) -> Result<(), String> {
    let store = ConfigStore::open_default().ok_or("No config directory on this platform")?;
    store.save(&config).map_err(|e| e.to_string())
}

pub fn detect_text(text: &str) -> AIDetectionResult {
    let result = analyze(text);
    info!(
        chars = text.chars().count(),
        tokens = estimate_tokens(text),
        score = result.score,
        level = result.level.as_str(),
        indicators = result.indicators.len(),
        "detect.completed"
    );
    result
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphDetection {
    pub block: TextBlock,
    pub result: AIDetectionResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDetection {
    pub file: String,
    pub chars: usize,
    pub overall: AIDetectionResult,
    pub paragraphs: Vec<ParagraphDetection>,
}

/// Score a file as a whole and per paragraph. Scoring runs on the extracted
/// text as-is; the short-text rule counts raw characters.
pub fn detect_file(path: &Path) -> Result<DocumentDetection, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("read file failed: {}", e))?;
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let text = extract_text(&file_name, &bytes).map_err(|e| e.to_string())?;
    let overall = detect_text(&text);
    let paragraphs = build_paragraph_blocks(&text)
        .into_iter()
        .map(|block| {
            let result = analyze(&block.text);
            ParagraphDetection { block, result }
        })
        .collect();

    Ok(DocumentDetection {
        file: path.display().to_string(),
        chars: text.chars().count(),
        overall,
        paragraphs,
    })
}

pub fn check_transcription(reference: &str, transcript: &str, threshold: Option<f64>) -> TranscriptionCheck {
    let threshold = threshold.unwrap_or_else(|| get_config().transcription.similarity_threshold);
    let check = verify_transcription(reference, transcript, threshold);
    info!(
        similarity = check.similarity,
        passed = check.passed,
        threshold,
        "transcription.checked"
    );
    check
}

/// One counseling message attributed to a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub student_id: String,
    pub text: String,
}

/// Replay a transcript of messages through a fresh monitor.
pub fn scan_messages(messages: &[ChatMessage], threshold: Option<u32>) -> Vec<RiskAlert> {
    let threshold = threshold.unwrap_or_else(|| get_config().risk.alert_threshold);
    let mut monitor = RiskMonitor::new(threshold);
    messages
        .iter()
        .filter_map(|m| monitor.observe(&m.student_id, &m.text))
        .collect()
}

/// Parse `student_id<TAB>message` lines; lines without a tab belong to `"unknown"`.
pub fn parse_chat_log(content: &str) -> Vec<ChatMessage> {
    content
        .lines()
        .filter(|ln| !ln.trim().is_empty())
        .map(|ln| match ln.split_once('\t') {
            Some((id, text)) => ChatMessage {
                student_id: id.trim().to_string(),
                text: text.to_string(),
            },
            None => ChatMessage {
                student_id: "unknown".to_string(),
                text: ln.to_string(),
            },
        })
        .collect()
}
