//! Command button panel.
//!
//! One button per top-level command, a toggle per command that has
//! sub-commands (revealing e.g. `work 1` / `work 2`), and a destructive
//! `clear` button. Buttons flow left to right and wrap onto new rows.
//!
//! # Features
//!
//! - Mouse click and hover highlighting
//! - Keyboard focus cycling (Tab / Shift+Tab), input line included
//! - Command buttons disabled while a reveal is running
//!
//! # Example
//!
//! ```ignore
//! let mut panel = ButtonPanel::new(session.catalog());
//! panel.layout(width, origin_row);
//! if let Some(action) = panel.handle_click(col, row, session.is_busy()) {
//!     // run it
//! }
//! ```

use bitflags::bitflags;
use unicode_width::UnicodeWidthStr;

use crate::core::catalog::CommandCatalog;

bitflags! {
    /// Visual state of a button
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ButtonState: u8 {
        const FOCUSED     = 0b00001;
        const HOVERED     = 0b00010;
        const DISABLED    = 0b00100;
        const DESTRUCTIVE = 0b01000;
        const EXPANDED    = 0b10000;
    }
}

/// Actions a button can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    /// Run a catalog command by name.
    Run(&'static str),
    /// Show or hide the sub-command buttons of a command.
    Toggle(&'static str),
    /// Empty the output. Allowed while busy.
    Clear,
}

impl PanelAction {
    /// Whether the busy flag disables this action.
    pub fn gated_by_busy(&self) -> bool {
        matches!(self, PanelAction::Run(_))
    }
}

/// A single button and its on-screen position.
#[derive(Debug, Clone)]
pub struct Button {
    pub label: String,
    pub action: PanelAction,
    pub x: u16,
    pub y: u16,
}

impl Button {
    fn new(label: impl Into<String>, action: PanelAction) -> Self {
        Self { label: label.into(), action, x: 0, y: 0 }
    }

    /// Width including one column of padding each side.
    pub fn width(&self) -> u16 {
        self.label.width() as u16 + 2
    }

    fn contains(&self, col: u16, row: u16) -> bool {
        row == self.y && col >= self.x && col < self.x + self.width()
    }
}

/// Gap between buttons on a row.
const BUTTON_GAP: u16 = 1;

/// Button panel state and behavior.
pub struct ButtonPanel {
    /// Top-level commands, in catalog order.
    commands: Vec<&'static str>,
    /// (parent, sub-commands) groups.
    groups: Vec<(&'static str, Vec<&'static str>)>,
    /// Parents whose sub-commands are shown.
    expanded: Vec<&'static str>,
    /// Visible buttons, in focus order.
    pub buttons: Vec<Button>,
    /// Focused button. `None` means the input line has focus.
    pub focus: Option<usize>,
    pub hover: Option<usize>,
    width: u16,
    origin: u16,
}

impl ButtonPanel {
    pub fn new(catalog: &CommandCatalog) -> Self {
        let commands = catalog.top_level().map(|e| e.name).collect();
        let groups = catalog
            .parents()
            .into_iter()
            .map(|parent| (parent, catalog.sub_commands(parent).map(|e| e.name).collect()))
            .collect();

        let mut panel = Self {
            commands,
            groups,
            expanded: Vec::new(),
            buttons: Vec::new(),
            focus: None,
            hover: None,
            width: 0,
            origin: 0,
        };
        panel.rebuild();
        panel
    }

    fn rebuild(&mut self) {
        let mut buttons: Vec<Button> = self
            .commands
            .iter()
            .map(|&name| Button::new(name, PanelAction::Run(name)))
            .collect();

        for (parent, subs) in &self.groups {
            let open = self.expanded.contains(parent);
            let marker = if open { '▾' } else { '▸' };
            buttons.push(Button::new(format!("{} {}", parent, marker), PanelAction::Toggle(*parent)));
            if open {
                buttons.extend(subs.iter().map(|&name| Button::new(name, PanelAction::Run(name))));
            }
        }

        buttons.push(Button::new("clear", PanelAction::Clear));
        self.buttons = buttons;

        if let Some(i) = self.focus {
            if i >= self.buttons.len() {
                self.focus = Some(self.buttons.len() - 1);
            }
        }
        self.hover = None;
        self.place();
    }

    /// Row/column of each button relative to the panel origin.
    fn arrange(&self, width: u16) -> Vec<(u16, u16)> {
        let mut positions = Vec::with_capacity(self.buttons.len());
        let (mut x, mut y) = (0u16, 0u16);
        for button in &self.buttons {
            let w = button.width();
            if x > 0 && x + w > width {
                x = 0;
                y += 1;
            }
            positions.push((x, y));
            x += w + BUTTON_GAP;
        }
        positions
    }

    /// Rows needed to show every button at `width`.
    pub fn height(&self, width: u16) -> u16 {
        self.arrange(width).last().map(|&(_, y)| y + 1).unwrap_or(0)
    }

    /// Position buttons for a panel starting at screen row `origin`.
    pub fn layout(&mut self, width: u16, origin: u16) {
        self.width = width;
        self.origin = origin;
        self.place();
    }

    fn place(&mut self) {
        let positions = self.arrange(self.width);
        for (button, (x, y)) in self.buttons.iter_mut().zip(positions) {
            button.x = x;
            button.y = self.origin + y;
        }
    }

    pub fn is_expanded(&self, parent: &str) -> bool {
        self.expanded.iter().any(|p| *p == parent)
    }

    /// Show or hide the sub-commands of `parent`.
    pub fn toggle(&mut self, parent: &'static str) {
        if let Some(pos) = self.expanded.iter().position(|p| *p == parent) {
            self.expanded.remove(pos);
        } else {
            self.expanded.push(parent);
        }
        self.rebuild();
    }

    /// Visual state of button `index`.
    pub fn state(&self, index: usize, busy: bool) -> ButtonState {
        let mut state = ButtonState::empty();
        let Some(button) = self.buttons.get(index) else {
            return state;
        };
        if self.focus == Some(index) {
            state |= ButtonState::FOCUSED;
        }
        if self.hover == Some(index) {
            state |= ButtonState::HOVERED;
        }
        if busy && button.action.gated_by_busy() {
            state |= ButtonState::DISABLED;
        }
        match button.action {
            PanelAction::Clear => state |= ButtonState::DESTRUCTIVE,
            PanelAction::Toggle(parent) if self.is_expanded(parent) => state |= ButtonState::EXPANDED,
            _ => {}
        }
        state
    }

    /// Move focus forward: input line, then each button, then back.
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            None if !self.buttons.is_empty() => Some(0),
            Some(i) if i + 1 < self.buttons.len() => Some(i + 1),
            _ => None,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            None => self.buttons.len().checked_sub(1),
            Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Return focus to the input line
    pub fn focus_input(&mut self) {
        self.focus = None;
    }

    /// Action of button `index`, unless disabled.
    pub fn activate(&self, index: usize, busy: bool) -> Option<PanelAction> {
        let button = self.buttons.get(index)?;
        if busy && button.action.gated_by_busy() {
            return None;
        }
        Some(button.action)
    }

    /// Action of the focused button, unless disabled.
    pub fn activate_focused(&self, busy: bool) -> Option<PanelAction> {
        self.focus.and_then(|i| self.activate(i, busy))
    }

    fn button_at(&self, col: u16, row: u16) -> Option<usize> {
        self.buttons.iter().position(|b| b.contains(col, row))
    }

    /// Handle a click, returning the action if an enabled button was hit
    pub fn handle_click(&mut self, col: u16, row: u16, busy: bool) -> Option<PanelAction> {
        let index = self.button_at(col, row)?;
        self.focus = Some(index);
        self.activate(index, busy)
    }

    /// Update hover state. Returns true if it changed.
    pub fn update_hover(&mut self, col: u16, row: u16) -> bool {
        let hover = self.button_at(col, row);
        if hover != self.hover {
            self.hover = hover;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> ButtonPanel {
        ButtonPanel::new(&CommandCatalog::new())
    }

    fn labels(panel: &ButtonPanel) -> Vec<&str> {
        panel.buttons.iter().map(|b| b.label.as_str()).collect()
    }

    #[test]
    fn test_default_buttons() {
        let panel = panel();
        assert_eq!(
            labels(&panel),
            vec!["help", "projects", "education", "work", "certifications", "work ▸", "clear"]
        );
    }

    #[test]
    fn test_toggle_reveals_sub_commands() {
        let mut panel = panel();
        panel.toggle("work");
        assert!(panel.is_expanded("work"));
        assert_eq!(
            labels(&panel),
            vec!["help", "projects", "education", "work", "certifications", "work ▾", "work 1", "work 2", "clear"]
        );
        assert_eq!(panel.activate(6, false), Some(PanelAction::Run("work 1")));
        assert!(panel.state(5, false).contains(ButtonState::EXPANDED));

        panel.toggle("work");
        assert_eq!(panel.buttons.len(), 7);
    }

    #[test]
    fn test_busy_disables_command_buttons_only() {
        let mut panel = panel();
        panel.toggle("work");
        let clear = panel.buttons.len() - 1;

        assert_eq!(panel.activate(0, true), None);
        assert!(panel.state(0, true).contains(ButtonState::DISABLED));
        assert_eq!(panel.activate(clear, true), Some(PanelAction::Clear));
        assert!(panel.state(clear, true).contains(ButtonState::DESTRUCTIVE));
        assert!(!panel.state(clear, true).contains(ButtonState::DISABLED));
        assert_eq!(panel.activate(5, true), Some(PanelAction::Toggle("work")));
    }

    #[test]
    fn test_layout_wraps() {
        let mut panel = panel();
        // " help " = 6, " projects " = 10, " education " = 11
        panel.layout(20, 10);
        assert_eq!((panel.buttons[0].x, panel.buttons[0].y), (0, 10));
        assert_eq!((panel.buttons[1].x, panel.buttons[1].y), (7, 10));
        assert_eq!((panel.buttons[2].x, panel.buttons[2].y), (0, 11));
        assert!(panel.height(20) > 2);
        assert_eq!(panel.height(200), 1);
    }

    #[test]
    fn test_click_and_hover() {
        let mut panel = panel();
        panel.layout(200, 4);
        assert_eq!(panel.handle_click(8, 4, false), Some(PanelAction::Run("projects")));
        assert_eq!(panel.focus, Some(1));
        // Gap column between buttons
        assert_eq!(panel.handle_click(6, 4, false), None);
        assert_eq!(panel.handle_click(8, 5, false), None);
        assert_eq!(panel.handle_click(0, 4, true), None);

        assert!(panel.update_hover(1, 4));
        assert!(!panel.update_hover(2, 4));
        assert!(panel.state(0, false).contains(ButtonState::HOVERED));
        assert!(panel.update_hover(1, 0));
        assert_eq!(panel.hover, None);
    }

    #[test]
    fn test_focus_cycle() {
        let mut panel = panel();
        let n = panel.buttons.len();
        assert_eq!(panel.focus, None);
        panel.focus_prev();
        assert_eq!(panel.focus, Some(n - 1));
        panel.focus_next();
        assert_eq!(panel.focus, None);
        panel.focus_next();
        assert_eq!(panel.focus, Some(0));
        panel.focus_prev();
        assert_eq!(panel.focus, None);
    }

    #[test]
    fn test_focus_clamped_after_collapse() {
        let mut panel = panel();
        panel.toggle("work");
        panel.focus = Some(panel.buttons.len() - 1);
        panel.toggle("work");
        assert_eq!(panel.focus, Some(panel.buttons.len() - 1));
        assert_eq!(panel.activate_focused(false), Some(PanelAction::Clear));
    }
}
