//! Typewriter reveal driver.
//!
//! Reveals a list of lines into an [`OutputBuffer`] one character at a time.
//! The driver is a plain step-state machine: every call to [`RevealDriver::step`]
//! performs exactly one discrete step and returns how long the caller should
//! wait before the next one. It never sleeps and never looks at a clock.
//!
//! ```text
//! Idle ──start──▶ RevealingChar(line, i) ──last char──▶ BetweenLines(line)
//!                      ▲        │                              │
//!                      └─ i+1 ──┘        next line non-blank ◀─┤
//!                                        next line blank ──────┘ (BetweenLines(line+1))
//!                                        no more lines ─────────▶ Done
//! ```

use std::time::Duration;

use super::output::OutputBuffer;

/// Default delay between revealed characters.
pub const DEFAULT_CHAR_INTERVAL: Duration = Duration::from_millis(25);
/// Default delay after a line before the next one starts.
pub const DEFAULT_LINE_DELAY: Duration = Duration::from_millis(25);

/// Reveal pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTiming {
    pub char_interval: Duration,
    pub line_delay: Duration,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            char_interval: DEFAULT_CHAR_INTERVAL,
            line_delay: DEFAULT_LINE_DELAY,
        }
    }
}

impl RevealTiming {
    /// No delays at all.
    pub const fn instant() -> Self {
        Self {
            char_interval: Duration::ZERO,
            line_delay: Duration::ZERO,
        }
    }
}

/// Driver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Idle,
    /// The next step shows characters `0..=char_index` of `line`.
    RevealingChar { line: usize, char_index: usize },
    /// `line` is finished (or was blank); the next step starts `line + 1`.
    BetweenLines { line: usize },
    Done,
}

/// Buffer slot the current line is being typed into.
#[derive(Debug, Clone, Copy)]
struct Slot {
    index: usize,
    generation: u64,
}

/// Step-driven typewriter animation.
#[derive(Debug)]
pub struct RevealDriver {
    timing: RevealTiming,
    state: RevealState,
    lines: Vec<String>,
    slot: Option<Slot>,
}

impl RevealDriver {
    pub fn new(timing: RevealTiming) -> Self {
        Self {
            timing,
            state: RevealState::Idle,
            lines: Vec::new(),
            slot: None,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> RevealState {
        self.state
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        matches!(
            self.state,
            RevealState::RevealingChar { .. } | RevealState::BetweenLines { .. }
        )
    }

    #[cfg(test)]
    pub fn is_done(&self) -> bool {
        self.state == RevealState::Done
    }

    /// Return to `Idle` after `Done`, dropping the finished lines.
    pub fn reset(&mut self) {
        self.state = RevealState::Idle;
        self.lines.clear();
        self.slot = None;
    }

    /// Begin revealing `lines`. The first line is scheduled immediately.
    ///
    /// Returns the delay before the next step, or `None` if there was
    /// nothing to reveal and the driver is already `Done`.
    pub fn start(&mut self, lines: Vec<String>, out: &mut OutputBuffer) -> Option<Duration> {
        self.lines = lines;
        self.slot = None;
        self.begin_line(0, out)
    }

    /// Perform one step. Returns the delay before the next step.
    pub fn step(&mut self, out: &mut OutputBuffer) -> Option<Duration> {
        match self.state {
            RevealState::Idle | RevealState::Done => None,
            RevealState::RevealingChar { line, char_index } => {
                let text = &self.lines[line];
                let len = text.len();
                let end = text
                    .char_indices()
                    .nth(char_index + 1)
                    .map(|(i, _)| i)
                    .unwrap_or(len);

                let slot = self.live_slot(out);
                out.write_slot(slot, &self.lines[line][..end]);

                if end == len {
                    self.state = RevealState::BetweenLines { line };
                    Some(self.timing.line_delay)
                } else {
                    self.state = RevealState::RevealingChar { line, char_index: char_index + 1 };
                    Some(self.timing.char_interval)
                }
            }
            RevealState::BetweenLines { line } => self.begin_line(line + 1, out),
        }
    }

    fn begin_line(&mut self, line: usize, out: &mut OutputBuffer) -> Option<Duration> {
        let Some(text) = self.lines.get(line) else {
            self.state = RevealState::Done;
            self.slot = None;
            return None;
        };

        if text.is_empty() {
            // Blank lines take a scheduling step but show nothing.
            self.state = RevealState::BetweenLines { line };
            return Some(self.timing.line_delay);
        }

        self.slot = Some(Slot {
            index: out.open_slot(),
            generation: out.generation(),
        });
        self.state = RevealState::RevealingChar { line, char_index: 0 };
        Some(self.timing.char_interval)
    }

    /// The slot to type into, reopened if the buffer was cleared under us.
    fn live_slot(&mut self, out: &mut OutputBuffer) -> usize {
        match self.slot {
            Some(slot) if slot.generation == out.generation() && slot.index < out.len() => slot.index,
            _ => {
                let slot = Slot {
                    index: out.open_slot(),
                    generation: out.generation(),
                };
                self.slot = Some(slot);
                slot.index
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_start_opens_placeholder() {
        let mut out = OutputBuffer::new();
        let mut driver = RevealDriver::new(RevealTiming::default());
        let delay = driver.start(lines(&["ab"]), &mut out);

        assert_eq!(delay, Some(DEFAULT_CHAR_INTERVAL));
        assert_eq!(out.lines(), &[String::new()]);
        assert_eq!(driver.state(), RevealState::RevealingChar { line: 0, char_index: 0 });
    }

    #[test]
    fn test_reveals_char_by_char() {
        let mut out = OutputBuffer::new();
        let mut driver = RevealDriver::new(RevealTiming::default());
        driver.start(lines(&["abc", "de"]), &mut out);

        assert_eq!(driver.step(&mut out), Some(DEFAULT_CHAR_INTERVAL));
        assert_eq!(out.lines()[0], "a");
        assert_eq!(driver.step(&mut out), Some(DEFAULT_CHAR_INTERVAL));
        assert_eq!(out.lines()[0], "ab");
        assert_eq!(driver.step(&mut out), Some(DEFAULT_LINE_DELAY));
        assert_eq!(out.lines()[0], "abc");
        assert_eq!(driver.state(), RevealState::BetweenLines { line: 0 });
        // Line 1 has not started yet.
        assert_eq!(out.len(), 1);

        assert_eq!(driver.step(&mut out), Some(DEFAULT_CHAR_INTERVAL));
        assert_eq!(out.lines(), &["abc".to_string(), String::new()]);
        driver.step(&mut out);
        driver.step(&mut out);
        assert_eq!(out.lines()[1], "de");

        // Trailing delay, then done.
        assert_eq!(driver.state(), RevealState::BetweenLines { line: 1 });
        assert_eq!(driver.step(&mut out), None);
        assert!(driver.is_done());
        assert!(!driver.is_running());
    }

    #[test]
    fn test_blank_line_consumes_step() {
        let mut out = OutputBuffer::new();
        let mut driver = RevealDriver::new(RevealTiming::default());
        driver.start(lines(&["", "x"]), &mut out);

        assert_eq!(driver.state(), RevealState::BetweenLines { line: 0 });
        assert!(out.is_empty());
        assert_eq!(driver.step(&mut out), Some(DEFAULT_CHAR_INTERVAL));
        assert_eq!(driver.step(&mut out), Some(DEFAULT_LINE_DELAY));
        assert_eq!(out.lines(), &["x".to_string()]);
    }

    #[test]
    fn test_multibyte_chars() {
        let mut out = OutputBuffer::new();
        let mut driver = RevealDriver::new(RevealTiming::instant());
        driver.start(lines(&["né✓"]), &mut out);

        driver.step(&mut out);
        assert_eq!(out.lines()[0], "n");
        driver.step(&mut out);
        assert_eq!(out.lines()[0], "né");
        assert_eq!(driver.step(&mut out), Some(Duration::ZERO));
        assert_eq!(out.lines()[0], "né✓");
    }

    #[test]
    fn test_empty_input_is_done_immediately() {
        let mut out = OutputBuffer::new();
        let mut driver = RevealDriver::new(RevealTiming::default());
        assert_eq!(driver.start(Vec::new(), &mut out), None);
        assert!(driver.is_done());
        driver.reset();
        assert_eq!(driver.state(), RevealState::Idle);
        assert_eq!(driver.step(&mut out), None);
    }

    #[test]
    fn test_reopens_slot_after_clear() {
        let mut out = OutputBuffer::new();
        out.push("> help");
        let mut driver = RevealDriver::new(RevealTiming::default());
        driver.start(lines(&["abc"]), &mut out);
        driver.step(&mut out);
        assert_eq!(out.lines()[1], "a");

        out.clear();
        driver.step(&mut out);
        assert_eq!(out.lines(), &["ab".to_string()]);
        driver.step(&mut out);
        assert_eq!(out.lines(), &["abc".to_string()]);
    }

    #[test]
    fn test_clear_then_refill_does_not_reuse_stale_slot() {
        let mut out = OutputBuffer::new();
        let mut driver = RevealDriver::new(RevealTiming::default());
        driver.start(lines(&["abc"]), &mut out);
        driver.step(&mut out);

        out.clear();
        out.push("notice");
        driver.step(&mut out);
        assert_eq!(out.lines(), &["notice".to_string(), "ab".to_string()]);
    }
}
