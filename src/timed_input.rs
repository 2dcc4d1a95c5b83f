//! Deadline-bounded line input with a live countdown.
//!
//! Two strategies share the [`TimedInputReader`] contract:
//! - [`PollingReader`]: polls a [`KeySource`] for single keystrokes, echoing
//!   and erasing characters itself.
//! - [`ReadinessReader`]: waits on a [`LineSource`] until a full line is
//!   ready, then reads it in one go.
//!
//! Both redraw `\r{prompt}{typed}   {remaining}s` whenever the shown text or
//! the remaining whole seconds change, and return `Ok(None)` once the
//! deadline passes. Uncommitted keystrokes are dropped on timeout.

use crate::debug_log;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Granularity of the keystroke poll.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Longest single wait for line readiness.
pub const WAIT_INTERVAL: Duration = Duration::from_millis(200);
/// Blank cells written after the timer so shorter redraws erase longer ones.
const PADDING: usize = 10;

pub trait TimedInputReader {
    /// Reads one committed line, or `None` if `timeout` elapses first.
    fn read_with_deadline(&mut self, prompt: &str, timeout: Duration)
    -> io::Result<Option<String>>;
}

impl<T: TimedInputReader + ?Sized> TimedInputReader for &mut T {
    fn read_with_deadline(
        &mut self,
        prompt: &str,
        timeout: Duration,
    ) -> io::Result<Option<String>> {
        (**self).read_with_deadline(prompt, timeout)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keystroke {
    Char(char),
    Backspace,
    Enter,
    /// Ctrl-C while the terminal is in raw mode.
    Interrupt,
}

/// Single-keystroke input, e.g. a terminal in raw mode.
pub trait KeySource {
    /// Called before the first poll of a read.
    fn begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Called once the read is over, whatever its result.
    fn end(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Waits at most `wait` for the next keystroke.
    fn next_key(&mut self, wait: Duration) -> io::Result<Option<Keystroke>>;
}

/// Line-buffered input with a readiness check.
pub trait LineSource {
    /// Waits at most `wait`; `true` means `read_line` will not block.
    fn wait_ready(&mut self, wait: Duration) -> io::Result<bool>;

    fn read_line(&mut self) -> io::Result<String>;
}

/// Whole seconds left before `deadline`, rounded up so a fresh countdown
/// starts at the full timeout.
pub fn remaining_secs(deadline: Instant, now: Instant) -> u64 {
    let left = deadline.saturating_duration_since(now);
    left.as_secs() + u64::from(left.subsec_nanos() > 0)
}

fn deadline_after(timeout: Duration) -> io::Result<Instant> {
    Instant::now()
        .checked_add(timeout)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "time limit too large"))
}

fn render_line<W: Write>(out: &mut W, prompt: &str, typed: &str, remaining: u64) -> io::Result<()> {
    write!(out, "\r{prompt}{typed}   {remaining:2}s{:width$}", "", width = PADDING)?;
    out.flush()
}

/// Remembers the last frame so unchanged frames are not redrawn.
#[derive(Default)]
struct Countdown {
    last: Option<(String, u64)>,
}

impl Countdown {
    fn show<W: Write>(
        &mut self,
        out: &mut W,
        prompt: &str,
        typed: &str,
        remaining: u64,
    ) -> io::Result<()> {
        let unchanged = self
            .last
            .as_ref()
            .is_some_and(|(shown, secs)| shown == typed && *secs == remaining);
        if unchanged {
            return Ok(());
        }
        render_line(out, prompt, typed, remaining)?;
        self.last = Some((typed.to_string(), remaining));
        Ok(())
    }
}

/// Polls for keystrokes and keeps its own edit buffer.
pub struct PollingReader<K, W> {
    keys: K,
    out: W,
    interval: Duration,
}

impl<K: KeySource, W: Write> PollingReader<K, W> {
    pub fn new(keys: K, out: W) -> Self {
        Self {
            keys,
            out,
            interval: POLL_INTERVAL,
        }
    }

    pub fn into_inner(self) -> (K, W) {
        (self.keys, self.out)
    }

    fn poll_until(&mut self, prompt: &str, deadline: Instant) -> io::Result<Option<String>> {
        let mut typed = String::new();
        let mut countdown = Countdown::default();
        loop {
            let now = Instant::now();
            countdown.show(&mut self.out, prompt, &typed, remaining_secs(deadline, now))?;
            if now >= deadline {
                debug_log!("PollingReader - deadline reached, dropping {:?}", typed);
                return Ok(None);
            }

            let wait = self.interval.min(deadline - now);
            match self.keys.next_key(wait)? {
                Some(Keystroke::Enter) => return Ok(Some(typed.trim().to_string())),
                Some(Keystroke::Backspace) => {
                    typed.pop();
                }
                Some(Keystroke::Char(c)) => typed.push(c),
                Some(Keystroke::Interrupt) => {
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
                }
                None => {}
            }
        }
    }
}

impl<K: KeySource, W: Write> TimedInputReader for PollingReader<K, W> {
    fn read_with_deadline(
        &mut self,
        prompt: &str,
        timeout: Duration,
    ) -> io::Result<Option<String>> {
        let deadline = deadline_after(timeout)?;
        self.keys.begin()?;
        let result = self.poll_until(prompt, deadline);
        let ended = self.keys.end();
        writeln!(self.out)?;
        ended?;
        result
    }
}

/// Waits for a full line to become available, then reads it.
pub struct ReadinessReader<L, W> {
    lines: L,
    out: W,
    interval: Duration,
}

impl<L: LineSource, W: Write> ReadinessReader<L, W> {
    pub fn new(lines: L, out: W) -> Self {
        Self {
            lines,
            out,
            interval: WAIT_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn into_inner(self) -> (L, W) {
        (self.lines, self.out)
    }
}

impl<L: LineSource, W: Write> TimedInputReader for ReadinessReader<L, W> {
    fn read_with_deadline(
        &mut self,
        prompt: &str,
        timeout: Duration,
    ) -> io::Result<Option<String>> {
        let deadline = deadline_after(timeout)?;
        let mut countdown = Countdown::default();
        // The terminal echoes typed characters itself, so only the timer
        // changes between frames.
        loop {
            let now = Instant::now();
            countdown.show(&mut self.out, prompt, "", remaining_secs(deadline, now))?;
            if now >= deadline {
                writeln!(self.out)?;
                debug_log!("ReadinessReader - deadline reached");
                return Ok(None);
            }

            let wait = self.interval.min(deadline - now);
            if self.lines.wait_ready(wait)? {
                let line = self.lines.read_line()?;
                writeln!(self.out)?;
                return Ok(Some(line.trim().to_string()));
            }
        }
    }
}
