use anyhow::Context;
use hangman::cli::{GameConfig, InputStrategy, parse_cli, read_mode};
use hangman::logging::init_logging;
use hangman::terminal::{CrosstermKeys, StdinLines};
use hangman::wordbank::{WordBank, load_phrase_tokens_from_file, load_words_from_file};
use hangman::{Mode, PollingReader, ReadinessReader, Session, SessionRunner, info_log};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io;

fn main() {
    init_logging();
    let cli = parse_cli();
    let config = cli.game_config();

    let bank = match load_word_bank(
        cli.wordbank_path.as_deref(),
        cli.phrases_path.as_deref(),
        config.max_word_length,
    ) {
        Ok(bank) => bank,
        Err(e) => {
            eprintln!("{e:#}");
            return;
        }
    };

    if let Err(e) = play(&bank, cli.mode.map(Mode::from), &config) {
        eprintln!("{e:#}");
    }
}

fn load_word_bank(
    words_path: Option<&str>,
    phrases_path: Option<&str>,
    max_word_length: usize,
) -> anyhow::Result<WordBank> {
    let mut bank = WordBank::embedded(max_word_length);
    if let Some(path) = words_path {
        let words = load_words_from_file(path, max_word_length)
            .with_context(|| format!("Failed to load word list from '{path}'"))?;
        bank = bank.with_words(words);
    }
    if let Some(path) = phrases_path {
        let tokens = load_phrase_tokens_from_file(path)
            .with_context(|| format!("Failed to load phrase tokens from '{path}'"))?;
        bank = bank.with_phrase_tokens(tokens);
    }
    Ok(bank)
}

fn play(bank: &WordBank, mode: Option<Mode>, config: &GameConfig) -> anyhow::Result<()> {
    let mode = match mode {
        Some(mode) => mode,
        None => read_mode(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    let seed = config.seed.unwrap_or_else(rand::random);
    info_log!("play() - mode={:?}, seed={}", mode, seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut session = Session::new(bank, mode, config.max_lives, &mut rng)?;

    // The stdin pump must start after the mode prompt has read its line.
    match config.input_strategy {
        InputStrategy::Poll => {
            let reader = PollingReader::new(CrosstermKeys::new(), io::stdout());
            SessionRunner::new(reader, io::stdout(), config.time_limit).run(&mut session)?;
        }
        InputStrategy::Wait => {
            let reader = ReadinessReader::new(StdinLines::spawn()?, io::stdout());
            SessionRunner::new(reader, io::stdout(), config.time_limit).run(&mut session)?;
        }
    }
    Ok(())
}
