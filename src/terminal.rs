//! Real terminal backends for the timed input readers.

use crate::debug_log;
use crate::timed_input::{KeySource, Keystroke, LineSource};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

/// Keystrokes from crossterm, with raw mode held only while a read is active.
#[derive(Debug, Default)]
pub struct CrosstermKeys {
    raw: bool,
}

impl CrosstermKeys {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeySource for CrosstermKeys {
    fn begin(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        self.raw = true;
        Ok(())
    }

    fn end(&mut self) -> io::Result<()> {
        if self.raw {
            disable_raw_mode()?;
            self.raw = false;
        }
        Ok(())
    }

    fn next_key(&mut self, wait: Duration) -> io::Result<Option<Keystroke>> {
        if !event::poll(wait)? {
            return Ok(None);
        }
        match event::read()? {
            // Release and repeat events would double the input on some platforms
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(translate_key(key)),
            _other => {
                debug_log!("CrosstermKeys - ignoring event {:?}", _other);
                Ok(None)
            }
        }
    }
}

impl Drop for CrosstermKeys {
    fn drop(&mut self) {
        let _ = self.end();
    }
}

pub fn translate_key(key: KeyEvent) -> Option<Keystroke> {
    let modified = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Keystroke::Interrupt)
        }
        KeyCode::Char(c) if !modified && !c.is_control() && c != '\u{FFFD}' => {
            Some(Keystroke::Char(c))
        }
        KeyCode::Backspace => Some(Keystroke::Backspace),
        KeyCode::Enter => Some(Keystroke::Enter),
        _ => None,
    }
}

/// Complete stdin lines forwarded by a background reader thread.
///
/// The thread only moves lines onto the channel; it exits when stdin closes
/// or the receiver is dropped.
pub struct StdinLines {
    rx: Receiver<io::Result<String>>,
    pending: Option<String>,
}

impl StdinLines {
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("stdin-lines".to_string())
            .spawn(move || pump_lines(io::stdin().lock(), &tx))?;
        Ok(Self::from_receiver(rx))
    }

    pub fn from_receiver(rx: Receiver<io::Result<String>>) -> Self {
        Self { rx, pending: None }
    }
}

/// Forwards each line of `reader` without its line ending. Bytes that are not
/// UTF-8 become U+FFFD, so a garbled line is still a guess rather than an
/// error. Stops at end of input, after the first read error, or once nobody
/// is receiving.
pub fn pump_lines<R: BufRead>(mut reader: R, tx: &Sender<io::Result<String>>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let line = match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                while matches!(buf.last(), Some(b'\n' | b'\r')) {
                    buf.pop();
                }
                Ok(String::from_utf8_lossy(&buf).into_owned())
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => Err(e),
        };
        let failed = line.is_err();
        if tx.send(line).is_err() || failed {
            break;
        }
    }
}

fn input_closed() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "standard input closed")
}

impl LineSource for StdinLines {
    fn wait_ready(&mut self, wait: Duration) -> io::Result<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        match self.rx.recv_timeout(wait) {
            Ok(line) => {
                self.pending = Some(line?);
                Ok(true)
            }
            Err(RecvTimeoutError::Timeout) => Ok(false),
            Err(RecvTimeoutError::Disconnected) => Err(input_closed()),
        }
    }

    fn read_line(&mut self) -> io::Result<String> {
        match self.pending.take() {
            Some(line) => Ok(line),
            None => self.rx.recv().map_err(|_| input_closed())?,
        }
    }
}
