use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub const EMBEDDED_WORDS: &str = include_str!("resources/words.txt");
pub const EMBEDDED_PHRASE_TOKENS: &str = include_str!("resources/phrase_tokens.txt");

/// Longest word accepted into the single-word pool unless overridden.
pub const MAX_WORD_LENGTH: usize = 8;

/// Supplies the candidate pools a session draws its answer from.
///
/// Entries are lowercase and purely alphabetic. Words are at most the
/// configured maximum length; phrase tokens may be any length. No ordering
/// is implied, callers sample uniformly.
pub trait WordSource {
    fn candidate_words(&self) -> &[String];
    fn candidate_phrase_tokens(&self) -> &[String];
}

/// In-memory word source, loaded once at startup and passed to sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordBank {
    words: Vec<String>,
    phrase_tokens: Vec<String>,
}

impl WordBank {
    /// Builds a bank from already-normalised pools.
    pub fn new(words: Vec<String>, phrase_tokens: Vec<String>) -> Self {
        Self {
            words,
            phrase_tokens,
        }
    }

    /// The pools compiled into the binary.
    pub fn embedded(max_word_length: usize) -> Self {
        Self::new(
            load_words_from_str(EMBEDDED_WORDS, max_word_length),
            load_phrase_tokens_from_str(EMBEDDED_PHRASE_TOKENS),
        )
    }

    #[must_use]
    pub fn with_words(mut self, words: Vec<String>) -> Self {
        self.words = words;
        self
    }

    #[must_use]
    pub fn with_phrase_tokens(mut self, phrase_tokens: Vec<String>) -> Self {
        self.phrase_tokens = phrase_tokens;
        self
    }
}

impl WordSource for WordBank {
    fn candidate_words(&self) -> &[String] {
        &self.words
    }

    fn candidate_phrase_tokens(&self) -> &[String] {
        &self.phrase_tokens
    }
}

// Comment lines and anything with a non-letter in it fall out here.
fn normalize_entry(line: &str) -> Option<String> {
    let entry = line.trim().to_lowercase();
    if !entry.is_empty() && entry.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(entry)
    } else {
        None
    }
}

pub fn load_words_from_str(data: &str, max_word_length: usize) -> Vec<String> {
    data.lines()
        .filter_map(normalize_entry)
        .filter(|word| word.len() <= max_word_length)
        .collect()
}

pub fn load_phrase_tokens_from_str(data: &str) -> Vec<String> {
    data.lines().filter_map(normalize_entry).collect()
}

pub fn load_words_from_file<P: AsRef<Path>>(
    path: P,
    max_word_length: usize,
) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut words = Vec::new();
    for line in reader.lines() {
        if let Some(word) = normalize_entry(&line?)
            && word.len() <= max_word_length
        {
            words.push(word);
        }
    }
    Ok(words)
}

pub fn load_phrase_tokens_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut tokens = Vec::new();
    for line in reader.lines() {
        if let Some(token) = normalize_entry(&line?) {
            tokens.push(token);
        }
    }
    Ok(tokens)
}
