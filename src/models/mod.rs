// SchoolHub Data Models
// Result records shared by the detection services and the command surface

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============ AI Authorship Detection ============

/// Suspicion band derived from a 0-100 score.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuspicionLevel {
    Low,
    Medium,
    High,
}

impl SuspicionLevel {
    /// `< 30` low, `30..60` medium, `>= 60` high.
    pub fn from_score(score: u32) -> Self {
        if score < 30 {
            Self::Low
        } else if score < 60 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Text color token used by the review table.
    pub fn color_token(self) -> &'static str {
        match self {
            Self::Low => "text-green-600",
            Self::Medium => "text-yellow-600",
            Self::High => "text-red-600",
        }
    }

    /// Badge variant token used next to a submission.
    pub fn badge_variant(self) -> &'static str {
        match self {
            Self::Low => "secondary",
            Self::Medium => "outline",
            Self::High => "destructive",
        }
    }

    pub fn label_ko(self) -> &'static str {
        match self {
            Self::Low => "낮음",
            Self::Medium => "보통",
            Self::High => "높음",
        }
    }
}

/// Feature values behind a score, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DetectionDetails {
    /// Type-token ratio, 2 decimals.
    pub ttr: f64,
    pub avg_sentence_length: u32,
    /// Population standard deviation of sentence lengths, 1 decimal.
    #[serde(alias = "sentenceLengthVariance")]
    pub sentence_length_std_dev: f64,
    /// Connector occurrences per sentence, 2 decimals.
    pub connector_ratio: f64,
    /// Raw repetition score before the short-text multiplier.
    pub repetition_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AIDetectionResult {
    pub score: u32,
    pub level: SuspicionLevel,
    pub details: DetectionDetails,
    pub indicators: Vec<String>,
}

// ============ Counseling Risk Alerts ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordHit {
    pub keyword: String,
    pub occurrences: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAlert {
    pub id: Uuid,
    pub student_id: String,
    pub triggered_at: DateTime<Utc>,
    /// Counter value that crossed the threshold.
    pub keyword_count: u32,
    pub matched_keywords: Vec<String>,
    /// Leading characters of the message that tipped the counter.
    pub excerpt: String,
}

// ============ Transcription Verification ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionCheck {
    /// 0.0-1.0, 3 decimals.
    pub similarity: f64,
    pub passed: bool,
    pub distance: usize,
    pub reference_len: usize,
    pub transcript_len: usize,
}
