//! Terminal session state.
//!
//! A [`TerminalSession`] owns everything the widget shows: the input line,
//! the output buffer, the busy flag and the reveal in flight. Both input
//! paths (typed submission and button clicks) go through
//! [`TerminalSession::handle_command`].
//!
//! Time is passed in explicitly. The event loop calls [`TerminalSession::poll`]
//! with the current instant and sleeps until [`TerminalSession::next_deadline`].

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};

use super::catalog::{CommandCatalog, Resolved};
use super::output::{OutputBuffer, OverflowGuard};
use super::reveal::{RevealDriver, RevealTiming};

/// Prefix used when echoing a command into the output.
pub const ECHO_PREFIX: &str = "> ";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("a command is still running")]
    Busy,
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Outcome of an accepted command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A reveal was started.
    Started,
    /// The output was emptied.
    Cleared,
}

/// Interactive state of the terminal widget
pub struct TerminalSession {
    catalog: CommandCatalog,
    output: OutputBuffer,
    input: String,
    /// While set, no new command may begin.
    busy: bool,
    driver: RevealDriver,
    guard: OverflowGuard,
    /// When the next reveal step is due.
    deadline: Option<Instant>,
    /// Rows scrolled up from the bottom of the output.
    scroll: usize,
}

impl TerminalSession {
    pub fn new(catalog: CommandCatalog, timing: RevealTiming, guard: OverflowGuard) -> Self {
        Self {
            catalog,
            output: OutputBuffer::new(),
            input: String::new(),
            busy: false,
            driver: RevealDriver::new(timing),
            guard,
            deadline: None,
            scroll: 0,
        }
    }

    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    pub fn output(&self) -> &OutputBuffer {
        &self.output
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn guard(&self) -> &OverflowGuard {
        &self.guard
    }

    pub fn guard_mut(&mut self) -> &mut OverflowGuard {
        &mut self.guard
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Type a character into the input line. Ignored while busy.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if self.busy {
            return false;
        }
        self.input.push(ch);
        true
    }

    /// Delete the last input character. Ignored while busy.
    pub fn backspace(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.input.pop().is_some()
    }

    /// Submit the input line as a command and reset it.
    pub fn submit(&mut self, now: Instant) -> Result<Dispatch> {
        if self.busy {
            return Err(SessionError::Busy);
        }
        let command = std::mem::take(&mut self.input);
        self.handle_command(&command, now)
    }

    /// Run a command by name.
    pub fn handle_command(&mut self, command: &str, now: Instant) -> Result<Dispatch> {
        if self.busy {
            debug!(command, "rejected, reveal in progress");
            return Err(SessionError::Busy);
        }

        let lines = match self.catalog.resolve(command) {
            Resolved::Clear => {
                self.clear();
                return Ok(Dispatch::Cleared);
            }
            Resolved::Lines(lines) => lines,
        };

        info!(command, lines = lines.len(), "running command");

        let incoming = 1 + lines.iter().filter(|l| !l.is_empty()).count();
        if self.guard.apply(&mut self.output, incoming) {
            info!(capacity = self.guard.capacity(), "scrollback cleared before {:?}", command);
        }

        self.output.push(format!("{}{}", ECHO_PREFIX, command));
        self.scroll = 0;
        self.busy = true;

        match self.driver.start(lines, &mut self.output) {
            Some(delay) => self.deadline = Some(now + delay),
            None => self.finish(),
        }
        Ok(Dispatch::Started)
    }

    /// Empty the output. Not gated by the busy flag.
    pub fn clear(&mut self) {
        debug!(busy = self.busy, lines = self.output.len(), "clearing output");
        self.output.clear();
        self.scroll = 0;
    }

    /// Run every reveal step due at `now`. Returns true if anything changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Some(due) = self.deadline {
            if due > now {
                break;
            }
            changed = true;
            match self.driver.step(&mut self.output) {
                Some(delay) => self.deadline = Some(due + delay),
                None => self.finish(),
            }
        }
        changed
    }

    /// Drive the current reveal to completion without waiting.
    #[cfg(test)]
    pub fn run_to_idle(&mut self) {
        if !self.busy {
            return;
        }
        while self.driver.is_running() {
            self.driver.step(&mut self.output);
        }
        self.finish();
    }

    fn finish(&mut self) {
        self.driver.reset();
        self.deadline = None;
        self.busy = false;
        self.scroll = 0;
        info!("reveal complete");
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    /// Scroll towards older output, up to `max` rows from the bottom.
    pub fn scroll_up(&mut self, rows: usize, max: usize) {
        self.scroll = (self.scroll + rows).min(max);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_sub(rows);
    }
}
