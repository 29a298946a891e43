// AI Authorship Heuristic
// Statistical text metrics combined into a 0-100 suspicion score

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::models::{AIDetectionResult, DetectionDetails, SuspicionLevel};

/// Texts shorter than this (in chars) get their score dampened.
const SHORT_TEXT_CHARS: usize = 300;
const SHORT_TEXT_FACTOR: f64 = 0.7;

const TTR_BAND: (f64, f64) = (0.5, 0.75);
const SENTENCE_LEN_BAND: (f64, f64) = (35.0, 85.0);
const UNIFORM_STD_DEV_MAX: f64 = 20.0;
const UNIFORM_MIN_SENTENCES: usize = 3;
const CONNECTOR_RATIO_MIN: f64 = 0.3;
const REPETITION_MIN: u32 = 10;
const REPETITION_CAP: u32 = 30;

const PHRASE_WEIGHT: u32 = 5;
const SHINGLE_WEIGHT: u32 = 3;
const SHINGLE_MIN_CHARS: usize = 6;

pub const INDICATOR_TTR: &str = "어휘 다양성이 AI 작성 범위 내";
pub const INDICATOR_SENTENCE_LENGTH: &str = "문장 길이가 AI 패턴과 유사";
pub const INDICATOR_UNIFORM_LENGTH: &str = "문장 길이 변화가 적음 (일정한 패턴)";
pub const INDICATOR_CONNECTORS: &str = "접속사 사용 빈도가 높음";
pub const INDICATOR_REPETITION: &str = "AI 특유의 표현 패턴 감지";
pub const INDICATOR_SHORT_TEXT: &str = "(텍스트가 짧아 분석 신뢰도 낮음)";

/// Korean discourse connectors. Matched as raw substrings.
pub const CONNECTORS: [&str; 32] = [
    "그러나", "하지만", "그런데", "그래서", "따라서", "그러므로", "또한", "게다가",
    "더욱이", "뿐만 아니라", "그리고", "또는", "혹은", "왜냐하면", "결국", "즉",
    "다시 말해", "예를 들어", "예컨대", "특히", "무엇보다", "물론", "사실", "반면",
    "한편", "그럼에도", "이처럼", "이와 같이", "마지막으로", "첫째", "둘째", "셋째",
];

/// Stock phrases overrepresented in generated Korean prose.
pub const AI_PHRASES: [&str; 11] = [
    "할 수 있습니다",
    "라고 생각합니다",
    "다양한 관점에서",
    "중요한 역할을 합니다",
    "것으로 보입니다",
    "살펴보겠습니다",
    "결론적으로",
    "종합적으로",
    "의미가 있습니다",
    "필요가 있습니다",
    "주목할 만한",
];

fn sentence_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?。]\s*").expect("sentence break regex"))
}

fn non_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_\s가-힣]").expect("non-word regex"))
}

/// Split on sentence-final punctuation; fragments are trimmed and empties dropped.
pub fn split_sentences_for_scoring(text: &str) -> Vec<&str> {
    sentence_break_re()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Words made of ASCII word chars and Hangul syllables; everything else separates.
pub fn split_words(text: &str) -> Vec<String> {
    non_word_re()
        .replace_all(text, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

pub fn type_token_ratio<S: AsRef<str>>(words: &[S]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let unique: HashSet<&str> = words.iter().map(|w| w.as_ref()).collect();
    unique.len() as f64 / words.len() as f64
}

/// Mean and population standard deviation of sentence lengths in chars.
/// The deviation is 0 for fewer than two sentences.
pub fn sentence_length_stats(sentences: &[&str]) -> (f64, f64) {
    if sentences.is_empty() {
        return (0.0, 0.0);
    }
    let lengths: Vec<f64> = sentences.iter().map(|s| s.chars().count() as f64).collect();
    let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
    if lengths.len() < 2 {
        return (mean, 0.0);
    }
    let variance = lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / lengths.len() as f64;
    (mean, variance.sqrt())
}

/// Connector occurrences per sentence.
pub fn connector_ratio(text: &str, sentence_count: usize) -> f64 {
    if sentence_count == 0 {
        return 0.0;
    }
    let hits: usize = CONNECTORS.iter().map(|c| text.matches(c).count()).sum();
    hits as f64 / sentence_count as f64
}

/// Stock-phrase presence plus repeated 3-word shingles over whitespace tokens.
pub fn repetition_score(text: &str) -> u32 {
    let phrases = AI_PHRASES.iter().filter(|p| text.contains(*p)).count() as u32;

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut shingles: HashMap<String, u32> = HashMap::new();
    for window in tokens.windows(3) {
        *shingles.entry(window.join(" ")).or_insert(0) += 1;
    }
    let repeated = shingles
        .iter()
        .filter(|(k, n)| **n > 1 && k.chars().count() >= SHINGLE_MIN_CHARS)
        .count() as u32;

    phrases * PHRASE_WEIGHT + repeated * SHINGLE_WEIGHT
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Score `text` for machine-authorship suspicion. Total over all inputs.
pub fn analyze(text: &str) -> AIDetectionResult {
    let sentences = split_sentences_for_scoring(text);
    let words = split_words(text);

    let ttr = type_token_ratio(&words);
    let (avg_len, std_dev) = sentence_length_stats(&sentences);
    let connectors = connector_ratio(text, sentences.len());
    let repetition = repetition_score(text);

    let mut score: u32 = 0;
    let mut indicators: Vec<String> = Vec::new();

    if ttr >= TTR_BAND.0 && ttr <= TTR_BAND.1 {
        score += 15;
        indicators.push(INDICATOR_TTR.to_string());
    }
    if avg_len >= SENTENCE_LEN_BAND.0 && avg_len <= SENTENCE_LEN_BAND.1 {
        score += 10;
        indicators.push(INDICATOR_SENTENCE_LENGTH.to_string());
    }
    if std_dev < UNIFORM_STD_DEV_MAX && sentences.len() >= UNIFORM_MIN_SENTENCES {
        score += 20;
        indicators.push(INDICATOR_UNIFORM_LENGTH.to_string());
    }
    if connectors >= CONNECTOR_RATIO_MIN {
        score += 15;
        indicators.push(INDICATOR_CONNECTORS.to_string());
    }
    if repetition >= REPETITION_MIN {
        score += repetition.min(REPETITION_CAP);
        indicators.push(INDICATOR_REPETITION.to_string());
    }

    if text.chars().count() < SHORT_TEXT_CHARS {
        score = (score as f64 * SHORT_TEXT_FACTOR).floor() as u32;
        indicators.push(INDICATOR_SHORT_TEXT.to_string());
    }

    let score = score.min(100);

    AIDetectionResult {
        score,
        level: SuspicionLevel::from_score(score),
        details: DetectionDetails {
            ttr: round_to(ttr, 2),
            avg_sentence_length: avg_len.round() as u32,
            sentence_length_std_dev: round_to(std_dev, 1),
            connector_ratio: round_to(connectors, 2),
            repetition_score: repetition,
        },
        indicators,
    }
}

/// `None` is scored as the empty string.
pub fn analyze_opt(text: Option<&str>) -> AIDetectionResult {
    analyze(text.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK_REPORT: &str = "주인공은 끝까지 포기하지 않았고 그 모습이 정말 대단하다고 느꼈습니다. 이 책은 용기에 관한 이야기라고 생각합니다. 우리 반 친구들 모두가 이 책을 읽으면 좋겠다. 우리 반 친구들 중에는 겁이 많은 아이도 있다. 우리 반 친구들 앞에서 발표할 때 나도 많이 떨렸다. 우리 반 친구들 이름을 하나씩 떠올리며 책장을 넘겼습니다. 작가는 솔직한 마음이 가장 큰 힘이라고 생각합니다. 이 이야기는 다양한 관점에서 읽을 수 있다. 마지막 장면에서 주인공이 웃는 장면이 오래 기억에 남았어요. 용기를 내는 사람이 진짜 어른이라고 생각합니다. 다음 방학에는 작가의 다른 책도 꼭 찾아서 읽어 볼 생각이다.";

    const GENERATED_REVIEW: &str = "이 책은 우리에게 많은 것을 알려 줍니다. 또한 주인공의 선택은 다양한 관점에서 해석할 수 있습니다. 따라서 독자는 스스로 질문을 던지게 됩니다. 하지만 작가는 정답을 쉽게 제시하지 않습니다. 특히 결말 부분은 열린 해석을 남깁니다. 결론적으로 이 작품은 깊은 여운을 남긴다고 할 수 있습니다. 그러므로 청소년에게 꼭 권하고 싶은 책이라고 생각합니다. 물론 어려운 부분도 조금 있습니다. 그리고 인물들의 관계도 흥미롭게 그려집니다. 종합적으로 보면 읽을 가치가 충분한 책입니다.";

    #[test]
    fn test_empty_input() {
        let result = analyze("");
        assert_eq!(result.score, 0);
        assert_eq!(result.level, SuspicionLevel::Low);
        assert_eq!(result.details, DetectionDetails::default());
        assert_eq!(result.indicators, vec![INDICATOR_SHORT_TEXT.to_string()]);
    }

    #[test]
    fn test_none_is_empty() {
        assert_eq!(analyze_opt(None), analyze(""));
    }

    #[test]
    fn test_punctuation_only() {
        let result = analyze("...!?。 ");
        assert_eq!(result.score, 0);
        assert_eq!(result.details.ttr, 0.0);
        assert_eq!(result.details.avg_sentence_length, 0);
    }

    #[test]
    fn test_plain_short_sentence() {
        let result = analyze("오늘은 날씨가 좋다.");
        assert_eq!(result.score, 0);
        assert_eq!(result.level, SuspicionLevel::Low);
        assert_eq!(result.details.ttr, 1.0);
        assert_eq!(result.details.avg_sentence_length, 10);
        assert_eq!(result.indicators.last().map(String::as_str), Some(INDICATOR_SHORT_TEXT));
    }

    #[test]
    fn test_uniform_sentence_lengths() {
        let text = format!("{}. ", "가".repeat(50)).repeat(6);
        assert!(text.chars().count() >= 300);

        let result = analyze(&text);
        assert_eq!(result.details.avg_sentence_length, 50);
        assert_eq!(result.details.sentence_length_std_dev, 0.0);
        // Six identical tokens give one repeated shingle.
        assert_eq!(result.details.repetition_score, 3);
        assert_eq!(result.score, 30);
        assert_eq!(result.level, SuspicionLevel::Medium);
        assert_eq!(
            result.indicators,
            vec![INDICATOR_SENTENCE_LENGTH.to_string(), INDICATOR_UNIFORM_LENGTH.to_string()]
        );
    }

    #[test]
    fn test_repetition_rule() {
        assert!(BOOK_REPORT.chars().count() >= 300);
        assert_eq!(BOOK_REPORT.matches("라고 생각합니다").count(), 3);

        // Two stock phrases (5 each) plus "우리 반 친구들" repeated (3).
        assert_eq!(repetition_score(BOOK_REPORT), 13);

        let result = analyze(BOOK_REPORT);
        assert_eq!(result.details.repetition_score, 13);
        assert_eq!(result.score, 20 + 13);
        assert_eq!(result.level, SuspicionLevel::Medium);
        assert_eq!(
            result.indicators,
            vec![INDICATOR_UNIFORM_LENGTH.to_string(), INDICATOR_REPETITION.to_string()]
        );
    }

    #[test]
    fn test_repetition_is_capped() {
        let text = AI_PHRASES.join(" ");
        assert_eq!(repetition_score(&text), 55);
        let padded = format!("{} {}", text, "나".repeat(300));
        let result = analyze(&padded);
        assert_eq!(result.details.repetition_score, 55);
        assert_eq!(result.score, REPETITION_CAP);
        assert_eq!(result.indicators, vec![INDICATOR_REPETITION.to_string()]);
    }

    #[test]
    fn test_generated_review_rules_fire_in_order() {
        let result = analyze(GENERATED_REVIEW);
        assert_eq!(result.details.connector_ratio, 0.7);
        assert_eq!(result.details.repetition_score, 25);
        // (20 + 15 + 25) * 0.7
        assert_eq!(result.score, 42);
        assert_eq!(result.level, SuspicionLevel::Medium);
        assert_eq!(
            result.indicators,
            vec![
                INDICATOR_UNIFORM_LENGTH.to_string(),
                INDICATOR_CONNECTORS.to_string(),
                INDICATOR_REPETITION.to_string(),
                INDICATOR_SHORT_TEXT.to_string(),
            ]
        );
    }

    #[test]
    fn test_short_text_dampening() {
        // Only the uniform-length rule fires: floor(20 * 0.7).
        let result = analyze("오늘 우리는 도서관에 갔다. 책을 골랐다. 집에 왔다.");
        assert_eq!(result.score, 14);
        assert_eq!(result.indicators.last().map(String::as_str), Some(INDICATOR_SHORT_TEXT));
    }

    #[test]
    fn test_connector_ratio_monotonic() {
        let base = "오늘 우리는 도서관에 갔다. 책을 골랐다. 집에 왔다.";
        let more = base.replace("책을", "그리고 그리고 책을");
        let a = connector_ratio(base, split_sentences_for_scoring(base).len());
        let b = connector_ratio(&more, split_sentences_for_scoring(&more).len());
        assert_eq!(a, 0.0);
        assert!(b >= a);
        assert!((b - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_connectors_match_inside_words() {
        // "즉" inside "즉시" still counts.
        assert_eq!(connector_ratio("그는 즉시 떠났다", 1), 1.0);
    }

    #[test]
    fn test_ttr_bounds() {
        assert_eq!(type_token_ratio::<&str>(&[]), 0.0);
        assert_eq!(type_token_ratio(&["a", "a", "b", "c"]), 0.75);
        let ttr = type_token_ratio(&["책", "책", "책"]);
        assert!(ttr > 0.0 && ttr <= 1.0);
    }

    #[test]
    fn test_split_words_keeps_hangul_and_ascii() {
        let words = split_words("안녕, world_1! ㅋㅋ 좋아요");
        assert_eq!(words, vec!["안녕", "world_1", "좋아요"]);
    }

    #[test]
    fn test_split_sentences_for_scoring() {
        let sentences = split_sentences_for_scoring("첫 문장. 둘째 문장!  셋째?넷째。");
        assert_eq!(sentences, vec!["첫 문장", "둘째 문장", "셋째", "넷째"]);
    }

    #[test]
    fn test_sentence_length_stats() {
        assert_eq!(sentence_length_stats(&[]), (0.0, 0.0));
        assert_eq!(sentence_length_stats(&["abcd"]), (4.0, 0.0));
        let (mean, std_dev) = sentence_length_stats(&["ab", "abcdef"]);
        assert_eq!(mean, 4.0);
        assert_eq!(std_dev, 2.0);
    }

    #[test]
    fn test_deterministic_and_in_range() {
        let noisy = "그리고 ".repeat(500) + &AI_PHRASES.join(". ").repeat(20);
        for text in [BOOK_REPORT, GENERATED_REVIEW, noisy.as_str(), "a"] {
            let first = analyze(text);
            assert_eq!(first, analyze(text));
            assert!(first.score <= 100);
            assert_eq!(first.level, SuspicionLevel::from_score(first.score));
        }
    }
}
