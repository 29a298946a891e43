// SchoolHub Core Services

pub mod text_processor;
pub mod config_store;
pub mod document_reader;
pub mod detection;

pub use text_processor::*;
pub use config_store::*;
pub use document_reader::*;

// Re-export detection module functions
pub use detection::{
    analyze,
    analyze_opt,
    levenshtein,
    normalize_for_comparison,
    scan_message,
    similarity,
    verify_transcription,
    RiskMonitor,
};
