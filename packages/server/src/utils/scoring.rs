//! Accuracy and speed scoring for typed responses.
//!
//! Accuracy compares the typed text with the canonical text character by
//! character at equal positions. Both missing and extra characters count
//! against the attempt, so the denominator is the longer of the two texts.
//! Speed uses the conventional five-characters-per-word definition.

/// Characters counted as one "word" for WPM.
const CHARS_PER_WORD: f64 = 5.0;

/// Server-computed result of a typing attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypingScore {
    /// Percentage in `0.0..=100.0`, two decimals.
    pub accuracy: f64,
    /// Words per minute, two decimals.
    pub wpm: f64,
    /// Word positions that differ, plus missing or extra words.
    pub word_errors: u32,
}

/// Percentage of characters typed correctly.
pub fn accuracy(typed: &str, correct: &str) -> f64 {
    let typed: Vec<char> = typed.chars().collect();
    let correct: Vec<char> = correct.chars().collect();
    let total = typed.len().max(correct.len());
    if total == 0 {
        return 100.0;
    }
    let matching = typed
        .iter()
        .zip(correct.iter())
        .filter(|(a, b)| a == b)
        .count();
    round2(matching as f64 * 100.0 / total as f64)
}

/// Words per minute for `typed` over `elapsed_secs`.
///
/// Returns `None` when the elapsed time is not a positive finite number.
pub fn words_per_minute(typed: &str, elapsed_secs: f64) -> Option<f64> {
    if !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
        return None;
    }
    let words = typed.chars().count() as f64 / CHARS_PER_WORD;
    Some(round2(words / (elapsed_secs / 60.0)))
}

/// Number of word slots that do not match between the two texts.
pub fn word_errors(typed: &str, correct: &str) -> u32 {
    let typed: Vec<&str> = typed.split_whitespace().collect();
    let correct: Vec<&str> = correct.split_whitespace().collect();
    let mismatched = typed
        .iter()
        .zip(correct.iter())
        .filter(|(a, b)| a != b)
        .count();
    let length_gap = typed.len().abs_diff(correct.len());
    (mismatched + length_gap) as u32
}

/// Score a complete attempt. `None` if the elapsed time is unusable.
pub fn score(typed: &str, correct: &str, elapsed_secs: f64) -> Option<TypingScore> {
    Some(TypingScore {
        accuracy: accuracy(typed, correct),
        wpm: words_per_minute(typed, elapsed_secs)?,
        word_errors: word_errors(typed, correct),
    })
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
