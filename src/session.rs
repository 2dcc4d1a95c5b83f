//! Game session engine.
//!
//! A [`Session`] owns the secret answer, the reveal mask shown to the player,
//! the set of letters already tried and the remaining lives. Guesses and
//! timeouts are applied one at a time between prompts.
//!
//! # State Machine
//! - `InProgress` → `Won` once the mask has no placeholders
//! - `InProgress` → `Lost` once lives reach zero
//!
//! `Won` and `Lost` are terminal. The session does not refuse further calls
//! after that; the runner stops invoking it.

use crate::wordbank::WordSource;
use crate::{debug_log, info_log};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

pub const DEFAULT_MAX_LIVES: u32 = 6;
pub const PLACEHOLDER: char = '_';
pub const PHRASE_TOKEN_RANGE: RangeInclusive<usize> = 3..=5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    SingleWord,
    Phrase,
}

impl Mode {
    /// Human readable name used in the game banner.
    pub fn title(self) -> &'static str {
        match self {
            Self::SingleWord => "Basic (single word)",
            Self::Phrase => "Intermediate (phrase)",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Incorrect,
    AlreadyGuessed,
    InvalidInput,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    InProgress,
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pool {
    Words,
    PhraseTokens,
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Words => f.write_str("word"),
            Self::PhraseTokens => f.write_str("phrase token"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The pool the chosen mode draws from is empty.
    #[error("no candidates available in the {pool} pool")]
    NoCandidatesAvailable { pool: Pool },
}

/// Per-position view of the answer: either the real character or a placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealMask(Vec<char>);

impl RevealMask {
    fn for_answer(answer: &str) -> Self {
        Self(
            answer
                .chars()
                .map(|c| if c.is_alphabetic() { PLACEHOLDER } else { c })
                .collect(),
        )
    }

    fn reveal(&mut self, answer: &str, letter: char) {
        for (slot, c) in self.0.iter_mut().zip(answer.chars()) {
            if c == letter {
                *slot = c;
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.0.contains(&PLACEHOLDER)
    }

    pub fn chars(&self) -> &[char] {
        &self.0
    }

    /// Mask letters separated by single spaces, as shown on the `Word:` line.
    pub fn spaced(&self) -> String {
        let mut out = String::with_capacity(self.0.len() * 2);
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push(*c);
        }
        out
    }
}

impl fmt::Display for RevealMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.0 {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    answer: String,
    mask: RevealMask,
    guessed: BTreeSet<char>,
    lives: u32,
    max_lives: u32,
    mode: Mode,
}

impl Session {
    /// Draws an answer for `mode` from `source` and starts a fresh game.
    pub fn new<S, R>(
        source: &S,
        mode: Mode,
        max_lives: u32,
        rng: &mut R,
    ) -> Result<Self, SessionError>
    where
        S: WordSource + ?Sized,
        R: Rng,
    {
        let answer = choose_answer(source, mode, rng)?;
        info_log!("Session::new() - mode={:?}, answer length={}", mode, answer.len());
        Ok(Self::with_answer(&answer, max_lives, mode))
    }

    /// Starts a game on a fixed answer.
    pub fn with_answer(answer: &str, max_lives: u32, mode: Mode) -> Self {
        let answer = answer.to_lowercase();
        Self {
            mask: RevealMask::for_answer(&answer),
            answer,
            guessed: BTreeSet::new(),
            lives: max_lives,
            max_lives,
            mode,
        }
    }

    pub fn apply_guess(&mut self, guess: &str) -> GuessOutcome {
        let Some(letter) = single_letter(guess) else {
            debug_log!("apply_guess() - rejected input {:?}", guess);
            return GuessOutcome::InvalidInput;
        };

        if self.guessed.contains(&letter) {
            self.lose_life();
            debug_log!("apply_guess() - repeat of '{}', lives={}", letter, self.lives);
            return GuessOutcome::AlreadyGuessed;
        }

        self.guessed.insert(letter);
        if self.answer.contains(letter) {
            self.mask.reveal(&self.answer, letter);
            debug_log!("apply_guess() - '{}' revealed, mask={}", letter, self.mask);
            GuessOutcome::Correct
        } else {
            self.lose_life();
            debug_log!("apply_guess() - '{}' missed, lives={}", letter, self.lives);
            GuessOutcome::Incorrect
        }
    }

    /// Charges one life for a guess that never arrived.
    pub fn apply_timeout(&mut self) {
        self.lose_life();
        debug_log!("apply_timeout() - lives={}", self.lives);
    }

    pub fn is_won(&self) -> bool {
        self.mask.is_complete()
    }

    pub fn is_lost(&self) -> bool {
        self.lives == 0
    }

    /// A fully revealed answer wins even when no lives are left.
    pub fn state(&self) -> GameState {
        if self.is_won() {
            GameState::Won
        } else if self.is_lost() {
            GameState::Lost
        } else {
            GameState::InProgress
        }
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn mask(&self) -> &RevealMask {
        &self.mask
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn guessed_letters(&self) -> &BTreeSet<char> {
        &self.guessed
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }
}

/// Returns the lowercased letter if `input` is exactly one alphabetic character.
pub fn single_letter(input: &str) -> Option<char> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => c.to_lowercase().next(),
        _ => None,
    }
}

fn choose_answer<S, R>(source: &S, mode: Mode, rng: &mut R) -> Result<String, SessionError>
where
    S: WordSource + ?Sized,
    R: Rng,
{
    match mode {
        Mode::SingleWord => source
            .candidate_words()
            .choose(rng)
            .map(|word| word.to_lowercase())
            .ok_or(SessionError::NoCandidatesAvailable { pool: Pool::Words }),
        Mode::Phrase => {
            let tokens = source.candidate_phrase_tokens();
            if tokens.is_empty() {
                return Err(SessionError::NoCandidatesAvailable {
                    pool: Pool::PhraseTokens,
                });
            }
            let count = rng.gen_range(PHRASE_TOKEN_RANGE);
            let phrase: Vec<&str> = (0..count)
                .filter_map(|_| tokens.choose(rng).map(String::as_str))
                .collect();
            Ok(phrase.join(" ").to_lowercase())
        }
    }
}
