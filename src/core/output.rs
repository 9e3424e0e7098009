//! Output buffer and overflow guard.
//!
//! The buffer is the visual scrollback: an ordered list of display lines.
//! It only grows, except when cleared wholesale by `clear` or by the
//! overflow guard.

use tracing::debug;

/// Ordered display lines.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    lines: Vec<String>,
    /// Bumped on every clear so in-flight writers can tell their slot is gone.
    generation: u64,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append an empty entry and return its index.
    pub fn open_slot(&mut self) -> usize {
        self.lines.push(String::new());
        self.lines.len() - 1
    }

    /// Overwrite an existing entry. Returns false if the slot does not exist.
    pub fn write_slot(&mut self, slot: usize, text: &str) -> bool {
        match self.lines.get_mut(slot) {
            Some(line) => {
                line.clear();
                line.push_str(text);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Default lines reserved on top of the projected output.
pub const DEFAULT_PADDING: usize = 2;

/// Default one-line notice left after an overflow clear.
pub const DEFAULT_NOTICE: &str = "[output cleared]";

/// Capacity policy that keeps scrollback bounded.
///
/// The projection counts logical lines only; wrapping is ignored.
#[derive(Debug, Clone)]
pub struct OverflowGuard {
    /// Visible output lines. Zero disables the guard.
    capacity: usize,
    padding: usize,
    notice: Option<String>,
    enabled: bool,
}

impl Default for OverflowGuard {
    fn default() -> Self {
        Self {
            capacity: 0,
            padding: DEFAULT_PADDING,
            notice: Some(DEFAULT_NOTICE.to_string()),
            enabled: true,
        }
    }
}

impl OverflowGuard {
    pub fn new(capacity: usize, padding: usize, notice: Option<String>) -> Self {
        Self { capacity, padding, notice, enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.enabled && self.capacity > 0
    }

    /// Lines the buffer would hold after appending `incoming`, plus padding.
    pub fn projected(&self, existing: usize, incoming: usize) -> usize {
        existing + incoming + self.padding
    }

    pub fn would_overflow(&self, existing: usize, incoming: usize) -> bool {
        self.is_active() && self.projected(existing, incoming) > self.capacity
    }

    /// Clear `output` if `incoming` more lines would not fit.
    ///
    /// Returns true if the buffer was cleared.
    pub fn apply(&self, output: &mut OutputBuffer, incoming: usize) -> bool {
        if !self.would_overflow(output.len(), incoming) {
            return false;
        }
        debug!(
            existing = output.len(),
            incoming,
            capacity = self.capacity,
            "output projected past capacity, clearing"
        );
        output.clear();
        if let Some(ref notice) = self.notice {
            output.push(notice.clone());
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> OutputBuffer {
        let mut out = OutputBuffer::new();
        for i in 0..n {
            out.push(format!("line {}", i));
        }
        out
    }

    #[test]
    fn test_slots() {
        let mut out = OutputBuffer::new();
        out.push("> help");
        let slot = out.open_slot();
        assert_eq!(slot, 1);
        assert!(out.write_slot(slot, "Avail"));
        assert_eq!(out.lines(), &["> help".to_string(), "Avail".to_string()]);
        assert!(!out.write_slot(5, "nope"));
    }

    #[test]
    fn test_clear_bumps_generation() {
        let mut out = filled(3);
        let before = out.generation();
        out.clear();
        assert!(out.is_empty());
        assert_eq!(out.generation(), before + 1);
    }

    #[test]
    fn test_guard_within_capacity() {
        let guard = OverflowGuard::new(20, 2, None);
        let mut out = filled(10);
        // 10 + 8 + 2 = 20, not past capacity
        assert!(!guard.apply(&mut out, 8));
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn test_guard_clears_with_notice() {
        let guard = OverflowGuard::new(20, 2, Some("cleared".to_string()));
        let mut out = filled(10);
        assert!(guard.apply(&mut out, 9));
        assert_eq!(out.lines(), &["cleared".to_string()]);
    }

    #[test]
    fn test_guard_clears_without_notice() {
        let guard = OverflowGuard::new(5, 0, None);
        let mut out = filled(4);
        assert!(guard.apply(&mut out, 2));
        assert!(out.is_empty());
    }

    #[test]
    fn test_guard_inactive() {
        let mut out = filled(100);
        assert!(!OverflowGuard::disabled().apply(&mut out, 100));
        assert!(!OverflowGuard::new(0, 2, None).apply(&mut out, 100));
        assert_eq!(out.len(), 100);
    }
}
