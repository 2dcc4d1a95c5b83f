use crate::info_log;
use crate::session::{GameState, GuessOutcome, Session};
use crate::timed_input::TimedInputReader;
use std::io::{self, Write};
use std::time::Duration;

pub const DEFAULT_TIME_LIMIT_SECS: u64 = 15;
pub const MAX_TIME_LIMIT_SECS: u64 = 3600;
pub const GUESS_PROMPT: &str = "Enter a letter: ";

/// Drives one session to a terminal state, prompting through a timed reader.
pub struct SessionRunner<I, W> {
    input: I,
    out: W,
    time_limit: Duration,
}

impl<I: TimedInputReader, W: Write> SessionRunner<I, W> {
    pub fn new(input: I, out: W, time_limit: Duration) -> Self {
        Self {
            input,
            out,
            time_limit,
        }
    }

    pub fn into_inner(self) -> (I, W) {
        (self.input, self.out)
    }

    pub fn run(&mut self, session: &mut Session) -> io::Result<GameState> {
        self.display_banner(session)?;

        while session.state() == GameState::InProgress {
            writeln!(self.out, "\nLives left: {}", session.lives())?;
            writeln!(self.out, "Word: {}", session.mask().spaced())?;
            self.out.flush()?;

            let reply = self.input.read_with_deadline(GUESS_PROMPT, self.time_limit)?;
            // A blank line counts the same as no answer at all.
            match reply.filter(|text| !text.trim().is_empty()) {
                None => {
                    session.apply_timeout();
                    writeln!(self.out, "Time is up! You lost a life.")?;
                }
                Some(text) => {
                    let guess = text.to_lowercase();
                    let outcome = session.apply_guess(&guess);
                    self.display_outcome(outcome, &guess)?;
                }
            }
        }

        let state = session.state();
        info_log!("SessionRunner::run() - finished with {:?}", state);
        self.display_result(session, state)?;
        Ok(state)
    }

    fn display_banner(&mut self, session: &Session) -> io::Result<()> {
        writeln!(self.out, "Welcome to Hangman!")?;
        writeln!(self.out, "Game Mode: {}", session.mode().title())?;
        writeln!(
            self.out,
            "You have {} lives. Guess letters to reveal the word/phrase.",
            session.max_lives()
        )?;
        writeln!(
            self.out,
            "You have {} seconds per guess.\n",
            self.time_limit.as_secs()
        )
    }

    fn display_outcome(&mut self, outcome: GuessOutcome, guess: &str) -> io::Result<()> {
        match outcome {
            GuessOutcome::InvalidInput => writeln!(self.out, "Please enter a single letter."),
            GuessOutcome::AlreadyGuessed => {
                writeln!(self.out, "You've already guessed that letter. -1 life")
            }
            GuessOutcome::Correct => {
                writeln!(self.out, "Correct! Letter '{guess}' is in the word.")
            }
            GuessOutcome::Incorrect => {
                writeln!(self.out, "Wrong! Letter '{guess}' is not in the word.")
            }
        }
    }

    fn display_result(&mut self, session: &Session, state: GameState) -> io::Result<()> {
        if state == GameState::Won {
            writeln!(
                self.out,
                "\nCongratulations! You guessed the word: {}",
                session.answer()
            )?;
        } else {
            writeln!(
                self.out,
                "\nGame Over! The correct answer was: {}",
                session.answer()
            )?;
        }
        self.out.flush()
    }
}
