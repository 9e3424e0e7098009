//! Key mapping for terminal input
//!
//! Converts crossterm key and mouse events to widget actions.

use bitflags::bitflags;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

bitflags! {
    /// Modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        let mut result = Modifiers::empty();
        if mods.contains(KeyModifiers::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(KeyModifiers::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(KeyModifiers::ALT) {
            result |= Modifiers::ALT;
        }
        result
    }
}

/// Rows moved by PageUp/PageDown
pub const PAGE_ROWS: usize = 10;
/// Rows moved per mouse wheel notch
pub const WHEEL_ROWS: usize = 3;

/// What a key press asks the widget to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Type a character into the input line
    Insert(char),
    Backspace,
    /// Submit the input line
    Submit,
    /// Press the focused button
    Activate,
    FocusNext,
    FocusPrev,
    /// Empty the output (Ctrl+L)
    Clear,
    ScrollUp(usize),
    ScrollDown(usize),
    Quit,
}

/// What a mouse event asks the widget to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Click { col: u16, row: u16 },
    Hover { col: u16, row: u16 },
    ScrollUp(usize),
    ScrollDown(usize),
}

/// Key mapper for converting terminal events to actions
pub struct KeyMapper;

impl KeyMapper {
    /// Map a key event. `on_button` is true when a button has keyboard focus.
    pub fn map(event: &KeyEvent, on_button: bool) -> Option<KeyAction> {
        let mods = Modifiers::from(event.modifiers);

        if mods.contains(Modifiers::CTRL) {
            return match event.code {
                KeyCode::Char('c') | KeyCode::Char('d') => Some(KeyAction::Quit),
                KeyCode::Char('l') => Some(KeyAction::Clear),
                _ => None,
            };
        }

        match event.code {
            KeyCode::Esc => Some(KeyAction::Quit),
            KeyCode::Enter if on_button => Some(KeyAction::Activate),
            KeyCode::Enter => Some(KeyAction::Submit),
            KeyCode::Char(' ') if on_button => Some(KeyAction::Activate),
            KeyCode::Char(ch) if !mods.contains(Modifiers::ALT) => Some(KeyAction::Insert(ch)),
            KeyCode::Backspace => Some(KeyAction::Backspace),
            KeyCode::Tab if mods.contains(Modifiers::SHIFT) => Some(KeyAction::FocusPrev),
            KeyCode::Tab => Some(KeyAction::FocusNext),
            KeyCode::BackTab => Some(KeyAction::FocusPrev),
            KeyCode::PageUp => Some(KeyAction::ScrollUp(PAGE_ROWS)),
            KeyCode::PageDown => Some(KeyAction::ScrollDown(PAGE_ROWS)),
            KeyCode::Up if mods.contains(Modifiers::SHIFT) => Some(KeyAction::ScrollUp(1)),
            KeyCode::Down if mods.contains(Modifiers::SHIFT) => Some(KeyAction::ScrollDown(1)),
            _ => None,
        }
    }

    /// Map a mouse event
    pub fn map_mouse(event: &MouseEvent) -> Option<MouseAction> {
        let (col, row) = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(MouseAction::Click { col, row }),
            MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(MouseAction::Hover { col, row }),
            MouseEventKind::ScrollUp => Some(MouseAction::ScrollUp(WHEEL_ROWS)),
            MouseEventKind::ScrollDown => Some(MouseAction::ScrollDown(WHEEL_ROWS)),
            _ => None,
        }
    }
}
