/*!
 * Sentence segmentation for recognized text.
 *
 * OCR output is split into sentences so that each one can be cached and
 * translated independently. Runs of periods are first normalized to a
 * canonical `...` so that an ellipsis closes exactly one sentence.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static DOT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").expect("valid regex"));

static SPACE_BEFORE_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+([.,!?;:])").expect("valid regex"));

/// Marks that close a sentence
const TERMINALS: [char; 6] = ['.', '!', '?', '。', '！', '？'];

const ELLIPSIS: &str = "...";

fn is_terminal(ch: char) -> bool {
    TERMINALS.contains(&ch)
}

/// Collapse any run of two or more periods into `...`
pub fn normalize_ellipsis(text: &str) -> String {
    DOT_RUN.replace_all(text, ELLIPSIS).into_owned()
}

/// Remove whitespace left in front of punctuation marks
pub fn clean_punctuation_spacing(text: &str) -> String {
    SPACE_BEFORE_PUNCTUATION.replace_all(text, "$1").into_owned()
}

/// True for a sentence made of a single terminal mark, e.g. a stray `.`
pub fn is_bare_terminal(sentence: &str) -> bool {
    let mut chars = sentence.trim().chars();
    matches!((chars.next(), chars.next()), (Some(ch), None) if is_terminal(ch))
}

/// Split text into trimmed sentences, keeping terminal punctuation attached.
///
/// A trailing fragment without terminal punctuation becomes the last
/// sentence. No characters other than surrounding whitespace are dropped.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let normalized = normalize_ellipsis(text);
    let chars: Vec<char> = normalized.chars().collect();

    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        current.push(ch);

        if is_terminal(ch) {
            if ch == '.' && chars.get(i + 1) == Some(&'.') && chars.get(i + 2) == Some(&'.') {
                current.push_str("..");
                i += 2;
            }
            sentences.push(current.trim().to_string());
            current.clear();
        }
        i += 1;
    }

    let rest = current.trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }

    sentences
}
