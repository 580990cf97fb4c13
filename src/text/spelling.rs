/*!
 * Dictionary-based spell correction for recognized text.
 *
 * OCR output frequently contains single-character slips ("tbe", "wor1d").
 * When enabled in the session config, unknown words are replaced by the
 * most frequent dictionary word one edit away.
 */

use anyhow::{Context, Result};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::segmenter::clean_punctuation_spacing;

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:-\w+)*|[^\w\s]").expect("valid regex"));

/// Frequency dictionary with edit-distance-1 lookup
#[derive(Debug, Clone, Default)]
pub struct SpellChecker {
    /// Lowercase word to corpus frequency
    words: HashMap<String, u64>,
    /// Every character seen in the dictionary, used to generate edits
    alphabet: Vec<char>,
}

impl SpellChecker {
    /// Load a frequency dictionary with one `word count` pair per line
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read spelling dictionary: {:?}", path))?;
        let checker = Self::from_dictionary_str(&content);
        info!("Loaded spelling dictionary with {} words from {:?}", checker.len(), path);
        Ok(checker)
    }

    /// Build a dictionary from `word count` lines; malformed lines are skipped
    pub fn from_dictionary_str(content: &str) -> Self {
        let mut words = HashMap::new();
        let mut alphabet = BTreeSet::new();

        for line in content.lines() {
            let mut parts = line.split_whitespace();
            let (Some(word), Some(count)) = (parts.next(), parts.next()) else {
                continue;
            };
            let Ok(count) = count.parse::<u64>() else {
                continue;
            };
            let word = word.to_lowercase();
            alphabet.extend(word.chars());
            words.insert(word, count);
        }

        Self {
            words,
            alphabet: alphabet.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(&word.to_lowercase())
    }

    /// Correct every alphabetic token of `text`
    pub fn correct(&self, text: &str) -> String {
        let tokens: Vec<String> = TOKEN
            .find_iter(text)
            .map(|m| self.correct_token(m.as_str()))
            .collect();

        clean_punctuation_spacing(&tokens.join(" "))
    }

    fn correct_token(&self, token: &str) -> String {
        if !token.chars().all(char::is_alphabetic) {
            return token.to_string();
        }

        let lower = token.to_lowercase();
        if self.words.contains_key(&lower) {
            return token.to_string();
        }

        match self.best_candidate(&lower) {
            Some(best) => {
                let corrected = if token.chars().next().is_some_and(char::is_uppercase) {
                    capitalize(best)
                } else {
                    best.to_string()
                };
                if corrected != token {
                    debug!("[SPELL] {} -> {}", token, corrected);
                }
                corrected
            }
            None => token.to_string(),
        }
    }

    /// Closest-length, then most frequent, known word one edit away
    fn best_candidate(&self, word: &str) -> Option<&str> {
        let length = word.chars().count();

        edits1(word, &self.alphabet)
            .into_iter()
            .filter_map(|candidate| self.words.get_key_value(&candidate))
            .min_by(|(a, a_count), (b, b_count)| {
                let a_diff = a.chars().count().abs_diff(length);
                let b_diff = b.chars().count().abs_diff(length);
                a_diff
                    .cmp(&b_diff)
                    .then(b_count.cmp(a_count))
                    .then(a.cmp(b))
            })
            .map(|(word, _)| word.as_str())
    }
}

/// Process-wide spell checker, loaded lazily from a dictionary file
#[derive(Debug, Default)]
pub struct SpellingResource {
    /// Dictionary file; `None` disables correction entirely
    dictionary_path: Option<PathBuf>,
    checker: RwLock<Option<Arc<SpellChecker>>>,
}

impl SpellingResource {
    pub fn new(dictionary_path: Option<PathBuf>) -> Self {
        Self {
            dictionary_path,
            checker: RwLock::new(None),
        }
    }

    /// Resource with an already built checker (for testing)
    pub fn preloaded(checker: SpellChecker) -> Self {
        Self {
            dictionary_path: None,
            checker: RwLock::new(Some(Arc::new(checker))),
        }
    }

    /// The loaded checker, if any
    pub fn current(&self) -> Option<Arc<SpellChecker>> {
        self.checker.read().clone()
    }

    /// Load the dictionary if it is not loaded yet.
    ///
    /// A missing or unreadable dictionary is logged and leaves correction off.
    pub fn ensure_loaded(&self) {
        if self.checker.read().is_some() {
            return;
        }

        let Some(path) = &self.dictionary_path else {
            warn!("Spell correction enabled but no dictionary is configured");
            return;
        };

        let mut slot = self.checker.write();
        if slot.is_some() {
            return;
        }
        match SpellChecker::load(path) {
            Ok(checker) => *slot = Some(Arc::new(checker)),
            Err(e) => warn!("Spell correction unavailable: {:#}", e),
        }
    }

    /// Correct `text` if a checker is loaded, otherwise return it unchanged
    pub fn correct(&self, text: &str) -> String {
        match self.current() {
            Some(checker) => checker.correct(text),
            None => text.to_string(),
        }
    }
}

/// All strings one deletion, transposition, replacement or insertion away
fn edits1(word: &str, alphabet: &[char]) -> BTreeSet<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut edits = BTreeSet::new();

    for i in 0..=chars.len() {
        let (left, right) = chars.split_at(i);

        if !right.is_empty() {
            edits.insert(left.iter().chain(&right[1..]).collect());
        }
        if right.len() > 1 {
            let mut swapped = chars.clone();
            swapped.swap(i, i + 1);
            edits.insert(swapped.into_iter().collect());
        }
        for &ch in alphabet {
            if !right.is_empty() {
                edits.insert(left.iter().chain(std::iter::once(&ch)).chain(&right[1..]).collect());
            }
            edits.insert(left.iter().chain(std::iter::once(&ch)).chain(right).collect());
        }
    }

    edits
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
