// Text Processing Service
// Normalization and paragraph blocking for submitted documents

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\u{3000}\u{00A0}]").expect("space regex"))
}

fn horizontal_ws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t\x0C\x0B]+").expect("horizontal whitespace regex"))
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z0-9_]+|[가-힣]").expect("token regex"))
}

fn paragraph_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n").expect("paragraph regex"))
}

/// Normalize punctuation and whitespace in extracted text
pub fn normalize_punctuation(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut s = text.to_string();

    // Replace smart quotes
    s = s.replace(['\u{201c}', '\u{201d}'], "\"")
         .replace(['\u{2018}', '\u{2019}'], "'");

    // Replace em dash
    s = s.replace('\u{2014}', "-");

    // Replace ideographic space and non-breaking space
    s = space_re().replace_all(&s, " ").to_string();

    // Normalize line endings
    s = s.replace("\r\n", "\n").replace('\r', "\n");

    s = horizontal_ws_re().replace_all(&s, " ").to_string();

    s = s.lines()
         .map(|ln| ln.trim())
         .collect::<Vec<_>>()
         .join("\n");

    s.trim().to_string()
}

/// Estimate token count (Latin words + Hangul syllables)
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 1;
    }
    token_re().find_iter(text).count().max(1)
}

/// First `max_chars` characters on a single line, with `...` when cut.
pub fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub index: usize,
    /// UTF-8 byte offset into the source text.
    pub start: usize,
    /// UTF-8 byte offset, end-exclusive.
    pub end: usize,
    pub text: String,
}

/// Build paragraph blocks from plain text.
/// Blank lines separate paragraphs; a text without any yields one block.
pub fn build_paragraph_blocks(text: &str) -> Vec<TextBlock> {
    let mut blocks = Vec::new();

    if text.trim().is_empty() {
        return blocks;
    }

    let mut cursor: usize = 0;
    for para in paragraph_re().split(text) {
        let trimmed = para.trim();
        if trimmed.is_empty() {
            continue;
        }

        let start = text[cursor..].find(trimmed).map(|i| cursor + i).unwrap_or(cursor);
        let end = start + trimmed.len();

        blocks.push(TextBlock {
            index: blocks.len(),
            start,
            end,
            text: trimmed.to_string(),
        });

        cursor = end;
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_punctuation() {
        let input = "그는 \u{201c}안녕\u{201d}이라고  말했다\u{3000}\r\n  다음 줄 ";
        let output = normalize_punctuation(input);
        assert_eq!(output, "그는 \"안녕\"이라고 말했다\n다음 줄");
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 1);
        assert_eq!(estimate_tokens("Hello World"), 2);
        assert_eq!(estimate_tokens("안녕하세요"), 5);
        assert_eq!(estimate_tokens("Hello 세계"), 3);
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("짧은 글", 10), "짧은 글");
        assert_eq!(preview("첫 줄\n둘째 줄", 10), "첫 줄 둘째 줄");
        assert_eq!(preview("가나다라마", 3), "가나다...");
    }

    #[test]
    fn test_build_paragraph_blocks() {
        let text = "첫 번째 문단입니다.\n\n\n두 번째 문단입니다.";
        let blocks = build_paragraph_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].index, 1);
        assert_eq!(&text[blocks[1].start..blocks[1].end], "두 번째 문단입니다.");
    }

    #[test]
    fn test_build_paragraph_blocks_single_and_empty() {
        assert!(build_paragraph_blocks("  \n\n ").is_empty());
        let blocks = build_paragraph_blocks("한 문단뿐입니다.\n줄바꿈만 있어요.");
        assert_eq!(blocks.len(), 1);
    }
}
