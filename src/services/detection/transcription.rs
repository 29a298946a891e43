// Transcription Verification
// Compares an OCR'd recitation transcript against the reference poem

use crate::models::TranscriptionCheck;
use crate::services::text_processor::normalize_punctuation;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.9;

fn unify_symbol(c: char) -> char {
    match c {
        '×' | '✕' => 'x',
        '÷' => '/',
        '−' | '–' | '—' | '‐' => '-',
        '·' | '•' => '.',
        // Full-width ASCII block
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        _ => c,
    }
}

/// Fold symbols and drop punctuation/whitespace so only the wording is compared.
pub fn normalize_for_comparison(text: &str) -> String {
    normalize_punctuation(text)
        .chars()
        .map(unify_symbol)
        .filter(|c| !c.is_whitespace() && !c.is_ascii_punctuation() && !is_cjk_punctuation(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_cjk_punctuation(c: char) -> bool {
    // CJK Symbols and Punctuation block covers the corner and angle brackets.
    matches!(c, '\u{3000}'..='\u{303F}' | '…')
}

/// Edit distance over Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// 1.0 for identical strings (including two empty ones), 0.0 for fully different.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

pub fn verify_transcription(reference: &str, transcript: &str, threshold: f64) -> TranscriptionCheck {
    let reference = normalize_for_comparison(reference);
    let transcript = normalize_for_comparison(transcript);

    let distance = levenshtein(&reference, &transcript);
    let score = similarity(&reference, &transcript);

    TranscriptionCheck {
        similarity: (score * 1000.0).round() / 1000.0,
        passed: score >= threshold,
        distance,
        reference_len: reference.chars().count(),
        transcript_len: transcript.chars().count(),
    }
}
