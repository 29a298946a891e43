// Counseling Risk Monitor
// Dangerous-keyword scan over counseling chat messages with per-student alert counters

use chrono::Utc;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{KeywordHit, RiskAlert};
use crate::services::text_processor::preview;

pub const DEFAULT_ALERT_THRESHOLD: u32 = 3;
const EXCERPT_CHARS: usize = 80;

/// Self-harm, abuse and violence markers.
pub const DANGER_KEYWORDS: [&str; 24] = [
    "자살", "죽고 싶", "죽고싶", "죽어버리", "자해", "손목", "뛰어내리", "목숨",
    "극단적 선택", "살기 싫", "살기싫", "사라지고 싶", "없어지고 싶", "유서", "수면제",
    "학대", "맞았", "때려", "폭력", "왕따", "따돌림", "괴롭힘", "협박", "성추행",
];

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"))
}

fn normalize_message(text: &str) -> String {
    whitespace_re().replace_all(text.trim(), " ").to_lowercase()
}

/// Keywords present in `text`, in list order, with their occurrence counts.
pub fn scan_message(text: &str) -> Vec<KeywordHit> {
    let normalized = normalize_message(text);
    if normalized.is_empty() {
        return Vec::new();
    }

    DANGER_KEYWORDS
        .iter()
        .filter_map(|kw| {
            let occurrences = normalized.matches(kw).count() as u32;
            (occurrences > 0).then(|| KeywordHit {
                keyword: kw.to_string(),
                occurrences,
            })
        })
        .collect()
}

/// Accumulates keyword hits per student and raises an alert when the
/// running count reaches the threshold. The counter resets after an alert.
#[derive(Debug, Clone)]
pub struct RiskMonitor {
    alert_threshold: u32,
    counters: HashMap<String, u32>,
}

impl Default for RiskMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_THRESHOLD)
    }
}

impl RiskMonitor {
    /// A threshold of 0 is treated as 1.
    pub fn new(alert_threshold: u32) -> Self {
        Self {
            alert_threshold: alert_threshold.max(1),
            counters: HashMap::new(),
        }
    }

    pub fn alert_threshold(&self) -> u32 {
        self.alert_threshold
    }

    pub fn count(&self, student_id: &str) -> u32 {
        self.counters.get(student_id).copied().unwrap_or(0)
    }

    pub fn reset(&mut self, student_id: &str) {
        self.counters.remove(student_id);
    }

    pub fn observe(&mut self, student_id: &str, message: &str) -> Option<RiskAlert> {
        let hits = scan_message(message);
        if hits.is_empty() {
            return None;
        }

        let added: u32 = hits.iter().map(|h| h.occurrences).sum();
        let counter = self.counters.entry(student_id.to_string()).or_insert(0);
        *counter = counter.saturating_add(added);
        debug!(student_id, added, total = *counter, "risk.keywords_observed");

        if *counter < self.alert_threshold {
            return None;
        }

        let keyword_count = *counter;
        self.counters.remove(student_id);

        let alert = RiskAlert {
            id: Uuid::new_v4(),
            student_id: student_id.to_string(),
            triggered_at: Utc::now(),
            keyword_count,
            matched_keywords: hits.into_iter().map(|h| h.keyword).collect(),
            excerpt: preview(message.trim(), EXCERPT_CHARS),
        };
        warn!(
            alert_id = %alert.id,
            student_id,
            keyword_count,
            "risk.alert_raised"
        );
        Some(alert)
    }
}
