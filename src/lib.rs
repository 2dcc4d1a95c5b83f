// Library interface for hangman
// This allows integration tests to access internal modules

pub mod cli;
pub mod game_state;
pub mod logging;
pub mod session;
pub mod terminal;
pub mod timed_input;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use game_state::SessionRunner;
pub use session::{GameState, GuessOutcome, Mode, Session, SessionError};
pub use timed_input::{PollingReader, ReadinessReader, TimedInputReader};
pub use wordbank::{WordBank, WordSource};
