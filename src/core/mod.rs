//! Core terminal widget logic.
//!
//! Everything here is independent of the actual terminal:
//!
//! - **catalog**: static command table and resolver
//! - **output**: output buffer and overflow guard
//! - **reveal**: step-driven typewriter animation
//! - **session**: widget state tying the pieces together
//!
//! # Architecture
//!
//! ```text
//! TerminalSession
//! ├── CommandCatalog (name -> canned response)
//! ├── OutputBuffer   (scrollback lines)
//! ├── OverflowGuard  (bounded scrollback)
//! └── RevealDriver   (Idle / RevealingChar / BetweenLines / Done)
//! ```

pub mod catalog;
pub mod output;
pub mod reveal;
pub mod session;
