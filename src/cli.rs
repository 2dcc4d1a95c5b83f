use crate::game_state::{DEFAULT_TIME_LIMIT_SECS, MAX_TIME_LIMIT_SECS};
use crate::session::{DEFAULT_MAX_LIVES, Mode};
use crate::wordbank::MAX_WORD_LENGTH;
use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use std::time::Duration;

/// Hangman with a per-guess countdown
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Game mode; prompts interactively when omitted
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Lives at the start of the game
    #[arg(short, long, default_value_t = DEFAULT_MAX_LIVES)]
    pub lives: u32,

    /// Seconds allowed for each guess
    #[arg(
        short = 't',
        long = "time-limit",
        default_value_t = DEFAULT_TIME_LIMIT_SECS,
        value_parser = clap::value_parser!(u64).range(1..=MAX_TIME_LIMIT_SECS)
    )]
    pub time_limit: u64,

    /// Longest word drawn in single-word mode
    #[arg(long, default_value_t = MAX_WORD_LENGTH)]
    pub max_word_length: usize,

    /// Path to a newline-delimited word list
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<String>,

    /// Path to a newline-delimited list of phrase tokens
    #[arg(short = 'p', long = "phrases")]
    pub phrases_path: Option<String>,

    /// Seed for answer selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// How guesses are read from the terminal
    #[arg(long, value_enum)]
    pub input_strategy: Option<InputStrategy>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Word,
    Phrase,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Word => Mode::SingleWord,
            ModeArg::Phrase => Mode::Phrase,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputStrategy {
    /// Raw keystrokes polled every 50ms, echoed by the game
    Poll,
    /// Line-buffered input, waited on in 200ms slices
    Wait,
}

impl InputStrategy {
    /// Windows consoles get keystroke polling; everything else waits on lines.
    pub fn platform_default() -> Self {
        if cfg!(windows) { Self::Poll } else { Self::Wait }
    }
}

/// Settings for a single game, resolved from the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub max_lives: u32,
    pub time_limit: Duration,
    pub max_word_length: usize,
    pub seed: Option<u64>,
    pub input_strategy: InputStrategy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_lives: DEFAULT_MAX_LIVES,
            time_limit: Duration::from_secs(DEFAULT_TIME_LIMIT_SECS),
            max_word_length: MAX_WORD_LENGTH,
            seed: None,
            input_strategy: InputStrategy::platform_default(),
        }
    }
}

impl Cli {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            max_lives: self.lives,
            time_limit: Duration::from_secs(self.time_limit),
            max_word_length: self.max_word_length,
            seed: self.seed,
            input_strategy: self
                .input_strategy
                .unwrap_or_else(InputStrategy::platform_default),
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// `2` picks phrase mode; anything else falls back to a single word.
pub fn parse_mode_choice(input: &str) -> Mode {
    match input.trim() {
        "2" => Mode::Phrase,
        _ => Mode::SingleWord,
    }
}

pub fn read_mode<R: BufRead, W: Write>(reader: &mut R, out: &mut W) -> io::Result<Mode> {
    writeln!(out, "Choose game mode:")?;
    writeln!(out, "1. {}", Mode::SingleWord.title())?;
    writeln!(out, "2. {}", Mode::Phrase.title())?;
    write!(out, "Enter 1 or 2: ")?;
    out.flush()?;

    let mut input = String::new();
    reader.read_line(&mut input)?;
    Ok(parse_mode_choice(&input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_cli_defaults() {
        let cli = Cli::try_parse_from(["hangman"]).unwrap();
        assert_eq!(cli.mode, None);
        assert_eq!(cli.lives, 6);
        assert_eq!(cli.time_limit, 15);
        assert_eq!(cli.max_word_length, 8);
        assert_eq!(cli.wordbank_path, None);
        assert_eq!(cli.seed, None);

        let config = cli.game_config();
        assert_eq!(config.time_limit, Duration::from_secs(15));
        assert_eq!(config.input_strategy, InputStrategy::platform_default());
    }

    #[test]
    fn test_game_config_default_matches_cli_defaults() {
        let cli = Cli::try_parse_from(["hangman"]).unwrap();
        assert_eq!(cli.game_config(), GameConfig::default());
    }

    #[test]
    fn test_parse_cli_with_options() {
        let cli = Cli::try_parse_from([
            "hangman",
            "--mode",
            "phrase",
            "-l",
            "3",
            "-t",
            "5",
            "-i",
            "words.txt",
            "--phrases",
            "tokens.txt",
            "--seed",
            "42",
            "--input-strategy",
            "poll",
        ])
        .unwrap();

        assert_eq!(cli.mode.map(Mode::from), Some(Mode::Phrase));
        assert_eq!(cli.wordbank_path.as_deref(), Some("words.txt"));
        assert_eq!(cli.phrases_path.as_deref(), Some("tokens.txt"));

        let config = cli.game_config();
        assert_eq!(config.max_lives, 3);
        assert_eq!(config.time_limit, Duration::from_secs(5));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.input_strategy, InputStrategy::Poll);
    }

    #[test]
    fn test_parse_cli_rejects_zero_time_limit() {
        assert!(Cli::try_parse_from(["hangman", "--time-limit", "0"]).is_err());
    }

    #[test]
    fn test_parse_cli_bounds_time_limit() {
        let cli = Cli::try_parse_from(["hangman", "-t", "3600"]).unwrap();
        assert_eq!(cli.game_config().time_limit, Duration::from_secs(3600));

        assert!(Cli::try_parse_from(["hangman", "-t", "3601"]).is_err());
        assert!(Cli::try_parse_from(["hangman", "-t", "18446744073709551615"]).is_err());
    }

    #[test]
    fn test_parse_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["hangman", "--mode", "sentence"]).is_err());
    }

    #[test]
    fn test_parse_mode_choice() {
        assert_eq!(parse_mode_choice("1"), Mode::SingleWord);
        assert_eq!(parse_mode_choice("2"), Mode::Phrase);
        assert_eq!(parse_mode_choice("  2 \n"), Mode::Phrase);
        assert_eq!(parse_mode_choice("3"), Mode::SingleWord);
        assert_eq!(parse_mode_choice(""), Mode::SingleWord);
        assert_eq!(parse_mode_choice("phrase"), Mode::SingleWord);
    }

    #[test]
    fn test_read_mode_prompt() {
        let mut reader = Cursor::new("2\n");
        let mut out = Vec::new();
        let mode = read_mode(&mut reader, &mut out).unwrap();
        assert_eq!(mode, Mode::Phrase);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1. Basic (single word)"));
        assert!(text.contains("2. Intermediate (phrase)"));
        assert!(text.ends_with("Enter 1 or 2: "));
    }

    #[test]
    fn test_read_mode_at_end_of_input() {
        let mut reader = Cursor::new("");
        let mut out = Vec::new();
        assert_eq!(read_mode(&mut reader, &mut out).unwrap(), Mode::SingleWord);
    }
}
