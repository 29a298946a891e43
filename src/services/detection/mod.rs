// Detection Module
// Text integrity checks organized into specialized submodules:
// - ai_detection: heuristic AI-authorship score for free-text submissions
// - risk_monitor: dangerous-keyword alerts over counseling chat
// - transcription: OCR transcript vs reference poem similarity

pub mod ai_detection;
pub mod risk_monitor;
pub mod transcription;

// Re-export commonly used functions
pub use ai_detection::{analyze, analyze_opt};
pub use risk_monitor::{scan_message, RiskMonitor};
pub use transcription::{levenshtein, normalize_for_comparison, similarity, verify_transcription};
