//! User interface rendering and input handling.
//!
//! This module provides all UI-related functionality:
//!
//! - **renderer**: Page shell and terminal widget drawing
//! - **keymapper**: Keyboard and mouse input to widget actions
//! - **button_panel**: Clickable command buttons

pub mod keymapper;
pub mod renderer;
pub mod button_panel;

pub use keymapper::{KeyAction, KeyMapper, MouseAction};
pub use renderer::{Layout, Renderer};
pub use button_panel::{ButtonPanel, PanelAction};
