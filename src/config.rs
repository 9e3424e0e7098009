//! Configuration and color scheme management for termfolio.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.termfolio/config.toml`
//! - Built-in color schemes (default, amber, solarized, nord, etc.)
//! - Conversion of settings into reveal timing and the overflow guard
//!
//! # Configuration File
//!
//! ```toml
//! title = "Welcome to My Portfolio"
//!
//! # Color scheme: default, amber, solarized-dark, nord, dracula, gruvbox-dark
//! color_scheme = "default"
//!
//! [animation]
//! typing_speed_ms = 25
//! line_delay_ms = 25
//!
//! [overflow]
//! enabled = true
//! # capacity = 30     # visible output lines; omit to follow the window height
//! padding = 2
//! notice = "[output cleared]"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::output::{OverflowGuard, DEFAULT_NOTICE, DEFAULT_PADDING};
use crate::core::reveal::RevealTiming;

/// Longest delay accepted for a single reveal step.
const MAX_STEP_MS: u64 = 5_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Heading shown above the terminal
    pub title: String,
    /// Color scheme name
    pub color_scheme: String,
    /// Typing animation settings
    pub animation: AnimationConfig,
    /// Scrollback bound settings
    pub overflow: OverflowConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Welcome to My Portfolio".to_string(),
            color_scheme: "default".to_string(),
            animation: AnimationConfig::default(),
            overflow: OverflowConfig::default(),
        }
    }
}

/// Typing animation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub typing_speed_ms: u64,
    pub line_delay_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            typing_speed_ms: 25,
            line_delay_ms: 25,
        }
    }
}

impl From<RevealTiming> for AnimationConfig {
    fn from(timing: RevealTiming) -> Self {
        Self {
            typing_speed_ms: timing.char_interval.as_millis() as u64,
            line_delay_ms: timing.line_delay.as_millis() as u64,
        }
    }
}

/// Overflow guard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverflowConfig {
    pub enabled: bool,
    /// Visible output lines. `None` follows the output region height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    pub padding: usize,
    /// Line left behind after a clear. Empty string for none.
    pub notice: String,
}

impl Default for OverflowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: None,
            padding: DEFAULT_PADDING,
            notice: DEFAULT_NOTICE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    pub fn load() -> Self {
        match Self::get_config_path() {
            Some(path) => Self::load_or_default(&path),
            None => Self::default(),
        }
    }

    /// Load `path` if it exists. Errors are logged and yield defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration to the default path
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::get_config_path()
            .ok_or_else(|| ConfigError::Invalid("could not determine config path".to_string()))?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write the configuration to `path`, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject values that would stall the animation
    pub fn validate(&self) -> Result<(), ConfigError> {
        let anim = &self.animation;
        if anim.typing_speed_ms > MAX_STEP_MS {
            return Err(ConfigError::Invalid(format!(
                "typing_speed_ms must be at most {}, got {}",
                MAX_STEP_MS, anim.typing_speed_ms
            )));
        }
        if anim.line_delay_ms > MAX_STEP_MS {
            return Err(ConfigError::Invalid(format!(
                "line_delay_ms must be at most {}, got {}",
                MAX_STEP_MS, anim.line_delay_ms
            )));
        }
        Ok(())
    }

    /// Get config file path
    pub fn get_config_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".termfolio").join("config.toml"))
    }

    /// Get the color scheme
    pub fn get_color_scheme(&self) -> ColorScheme {
        ColorScheme::by_name(&self.color_scheme)
    }

    /// Reveal pacing
    pub fn timing(&self) -> RevealTiming {
        RevealTiming {
            char_interval: Duration::from_millis(self.animation.typing_speed_ms),
            line_delay: Duration::from_millis(self.animation.line_delay_ms),
        }
    }

    /// Whether the guard capacity follows the window
    pub fn auto_capacity(&self) -> bool {
        self.overflow.enabled && self.overflow.capacity.is_none()
    }

    /// Build the overflow guard. Auto capacity starts at zero until the
    /// first layout sets it.
    pub fn overflow_guard(&self) -> OverflowGuard {
        if !self.overflow.enabled {
            return OverflowGuard::disabled();
        }
        let notice = if self.overflow.notice.is_empty() {
            None
        } else {
            Some(self.overflow.notice.clone())
        };
        OverflowGuard::new(self.overflow.capacity.unwrap_or(0), self.overflow.padding, notice)
    }
}

/// Color definition (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to crossterm Color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Color scheme definition
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    pub name: &'static str,

    // Page and terminal
    pub page_bg: Color,
    pub heading_fg: Color,
    pub terminal_bg: Color,
    pub border: Color,

    // Output text
    pub output_fg: Color,
    pub echo_fg: Color,
    pub notice_fg: Color,

    // Input line
    pub prompt_fg: Color,
    pub input_fg: Color,
    pub disabled_fg: Color,

    // Buttons
    pub button_bg: Color,
    pub button_fg: Color,
    pub button_hover_bg: Color,
    pub button_focus_bg: Color,
    pub button_focus_fg: Color,
    pub danger_bg: Color,
    pub danger_fg: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_scheme()
    }
}

impl ColorScheme {
    /// Green on black
    pub fn default_scheme() -> Self {
        Self {
            name: "default",

            page_bg: Color::new(17, 24, 39),
            heading_fg: Color::new(255, 255, 255),
            terminal_bg: Color::new(0, 0, 0),
            border: Color::new(55, 65, 81),

            output_fg: Color::new(34, 197, 94),
            echo_fg: Color::new(134, 239, 172),
            notice_fg: Color::new(250, 204, 21),

            prompt_fg: Color::new(34, 197, 94),
            input_fg: Color::new(34, 197, 94),
            disabled_fg: Color::new(20, 83, 45),

            button_bg: Color::new(22, 163, 74),
            button_fg: Color::new(0, 0, 0),
            button_hover_bg: Color::new(34, 197, 94),
            button_focus_bg: Color::new(187, 247, 208),
            button_focus_fg: Color::new(0, 0, 0),
            danger_bg: Color::new(185, 28, 28),
            danger_fg: Color::new(255, 255, 255),
        }
    }

    /// Amber phosphor
    pub fn amber() -> Self {
        Self {
            name: "amber",

            page_bg: Color::new(20, 14, 4),
            heading_fg: Color::new(255, 214, 102),
            terminal_bg: Color::new(8, 5, 0),
            border: Color::new(90, 60, 10),

            output_fg: Color::new(255, 176, 0),
            echo_fg: Color::new(255, 214, 102),
            notice_fg: Color::new(255, 120, 40),

            prompt_fg: Color::new(255, 176, 0),
            input_fg: Color::new(255, 176, 0),
            disabled_fg: Color::new(110, 76, 0),

            button_bg: Color::new(204, 140, 0),
            button_fg: Color::new(8, 5, 0),
            button_hover_bg: Color::new(255, 176, 0),
            button_focus_bg: Color::new(255, 230, 160),
            button_focus_fg: Color::new(8, 5, 0),
            danger_bg: Color::new(170, 40, 20),
            danger_fg: Color::new(255, 230, 160),
        }
    }

    /// Solarized Dark scheme
    pub fn solarized_dark() -> Self {
        Self {
            name: "solarized-dark",

            page_bg: Color::new(0, 43, 54),
            heading_fg: Color::new(253, 246, 227),
            terminal_bg: Color::new(7, 54, 66),
            border: Color::new(88, 110, 117),

            output_fg: Color::new(133, 153, 0),
            echo_fg: Color::new(42, 161, 152),
            notice_fg: Color::new(181, 137, 0),

            prompt_fg: Color::new(38, 139, 210),
            input_fg: Color::new(147, 161, 161),
            disabled_fg: Color::new(88, 110, 117),

            button_bg: Color::new(38, 139, 210),
            button_fg: Color::new(253, 246, 227),
            button_hover_bg: Color::new(42, 161, 152),
            button_focus_bg: Color::new(253, 246, 227),
            button_focus_fg: Color::new(0, 43, 54),
            danger_bg: Color::new(220, 50, 47),
            danger_fg: Color::new(253, 246, 227),
        }
    }

    /// Nord scheme
    pub fn nord() -> Self {
        Self {
            name: "nord",

            page_bg: Color::new(46, 52, 64),
            heading_fg: Color::new(236, 239, 244),
            terminal_bg: Color::new(36, 41, 51),
            border: Color::new(76, 86, 106),

            output_fg: Color::new(163, 190, 140),
            echo_fg: Color::new(136, 192, 208),
            notice_fg: Color::new(235, 203, 139),

            prompt_fg: Color::new(136, 192, 208),
            input_fg: Color::new(216, 222, 233),
            disabled_fg: Color::new(76, 86, 106),

            button_bg: Color::new(94, 129, 172),
            button_fg: Color::new(236, 239, 244),
            button_hover_bg: Color::new(129, 161, 193),
            button_focus_bg: Color::new(136, 192, 208),
            button_focus_fg: Color::new(46, 52, 64),
            danger_bg: Color::new(191, 97, 106),
            danger_fg: Color::new(236, 239, 244),
        }
    }

    /// Dracula scheme
    pub fn dracula() -> Self {
        Self {
            name: "dracula",

            page_bg: Color::new(40, 42, 54),
            heading_fg: Color::new(248, 248, 242),
            terminal_bg: Color::new(33, 34, 44),
            border: Color::new(68, 71, 90),

            output_fg: Color::new(80, 250, 123),
            echo_fg: Color::new(139, 233, 253),
            notice_fg: Color::new(241, 250, 140),

            prompt_fg: Color::new(255, 121, 198),
            input_fg: Color::new(248, 248, 242),
            disabled_fg: Color::new(98, 114, 164),

            button_bg: Color::new(189, 147, 249),
            button_fg: Color::new(40, 42, 54),
            button_hover_bg: Color::new(255, 121, 198),
            button_focus_bg: Color::new(248, 248, 242),
            button_focus_fg: Color::new(40, 42, 54),
            danger_bg: Color::new(255, 85, 85),
            danger_fg: Color::new(248, 248, 242),
        }
    }

    /// Gruvbox Dark scheme
    pub fn gruvbox_dark() -> Self {
        Self {
            name: "gruvbox-dark",

            page_bg: Color::new(40, 40, 40),
            heading_fg: Color::new(235, 219, 178),
            terminal_bg: Color::new(29, 32, 33),
            border: Color::new(80, 73, 69),

            output_fg: Color::new(184, 187, 38),
            echo_fg: Color::new(131, 165, 152),
            notice_fg: Color::new(250, 189, 47),

            prompt_fg: Color::new(254, 128, 25),
            input_fg: Color::new(235, 219, 178),
            disabled_fg: Color::new(102, 92, 84),

            button_bg: Color::new(215, 153, 33),
            button_fg: Color::new(40, 40, 40),
            button_hover_bg: Color::new(250, 189, 47),
            button_focus_bg: Color::new(235, 219, 178),
            button_focus_fg: Color::new(40, 40, 40),
            danger_bg: Color::new(204, 36, 29),
            danger_fg: Color::new(235, 219, 178),
        }
    }

    /// Get scheme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "amber" => Self::amber(),
            "solarized-dark" | "solarized_dark" | "solarized" => Self::solarized_dark(),
            "nord" => Self::nord(),
            "dracula" => Self::dracula(),
            "gruvbox-dark" | "gruvbox_dark" | "gruvbox" => Self::gruvbox_dark(),
            _ => Self::default_scheme(),
        }
    }

    /// List available schemes
    pub fn list() -> Vec<&'static str> {
        vec![
            "default",
            "amber",
            "solarized-dark",
            "nord",
            "dracula",
            "gruvbox-dark",
        ]
    }
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}
