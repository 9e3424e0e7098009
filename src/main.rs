//! termfolio - a portfolio page as a terminal
//!
//! termfolio shows a heading and a small simulated terminal. Visitors type
//! or click commands (`help`, `projects`, `education`, `work`,
//! `certifications`) and the answer is typed out character by character.
//!
//! # Features
//!
//! - **Typewriter output**: responses are revealed one character at a time
//! - **Command buttons**: every command is one click away, sub-commands behind a toggle
//! - **Bounded scrollback**: output is cleared before it would overflow the window
//! - **Color Schemes**: 6 built-in themes
//!
//! # Quick Start
//!
//! ```text
//! termfolio                  # Start with ~/.termfolio/config.toml or defaults
//! termfolio -t amber         # Amber theme
//! termfolio --instant        # No typing animation
//! ```
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | Enter | Run the typed command / press the focused button |
//! | Tab / Shift+Tab | Move focus between input and buttons |
//! | Ctrl+L | Clear output |
//! | PgUp/PgDn | Scroll output |
//! | Esc / Ctrl+C | Quit |

mod core;
mod ui;
mod config;

use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::{ColorScheme, Config};
use crate::core::catalog::CommandCatalog;
use crate::core::reveal::RevealTiming;
use crate::core::session::{Dispatch, TerminalSession};
use crate::ui::{ButtonPanel, KeyAction, KeyMapper, Layout, MouseAction, PanelAction, Renderer};

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Longest wait for input when no reveal step is due
const IDLE_POLL: Duration = Duration::from_millis(10);

/// Command line options. Anything set here overrides the config file.
#[derive(Debug, Default, PartialEq)]
struct Options {
    theme: Option<String>,
    typing_speed_ms: Option<u64>,
    line_delay_ms: Option<u64>,
    capacity: Option<usize>,
    no_overflow: bool,
    instant: bool,
    config_path: Option<PathBuf>,
    init_config: bool,
}

/// What the command line asks for
#[derive(Debug, PartialEq)]
enum Invocation {
    Run(Options),
    Help,
    Version,
}

fn print_version() {
    eprintln!("termfolio {}", VERSION);
}

fn print_help() {
    eprintln!("termfolio {} - A portfolio page as a terminal", VERSION);
    eprintln!();
    eprintln!("Usage: termfolio [OPTIONS]");
    eprintln!();
    eprintln!("Animation options:");
    eprintln!("  --speed <MS>          Delay between typed characters (default: 25)");
    eprintln!("  --line-delay <MS>     Delay between lines (default: 25)");
    eprintln!("  --instant             No typing animation");
    eprintln!();
    eprintln!("Output options:");
    eprintln!("  --capacity <LINES>    Clear output before it exceeds LINES");
    eprintln!("                        (default: height of the output area)");
    eprintln!("  --no-overflow         Never clear output automatically");
    eprintln!();
    eprintln!("Other options:");
    eprintln!("  -t, --theme <NAME>    Color scheme");
    eprintln!("  -c, --config <PATH>   Read configuration from PATH");
    eprintln!("  --init-config         Write the effective configuration to");
    eprintln!("                        ~/.termfolio/config.toml and exit");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  Enter                 Run the typed command / press the focused button");
    eprintln!("  Tab, Shift+Tab        Move focus between input and buttons");
    eprintln!("  Space                 Press the focused button");
    eprintln!("  Ctrl+L                Clear output");
    eprintln!("  PgUp/PgDn, Shift+↑/↓  Scroll output");
    eprintln!("  Esc, Ctrl+C           Quit");
    eprintln!();
    eprintln!("Configuration: ~/.termfolio/config.toml");
    eprintln!("Log file:      ~/.termfolio/termfolio.log (level via TERMFOLIO_LOG)");
    eprintln!();
    eprintln!("Color schemes: {}", ColorScheme::list().join(", "));
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("Missing argument for {}", flag))?;
    value
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, value))
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut options = Options::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(Invocation::Help),
            "-v" | "--version" => return Ok(Invocation::Version),
            // Animation
            "--speed" => {
                i += 1;
                options.typing_speed_ms = Some(parse_number("--speed", args.get(i))?);
            }
            "--line-delay" => {
                i += 1;
                options.line_delay_ms = Some(parse_number("--line-delay", args.get(i))?);
            }
            "--instant" => {
                options.instant = true;
            }
            // Output
            "--capacity" => {
                i += 1;
                options.capacity = Some(parse_number("--capacity", args.get(i))?);
            }
            "--no-overflow" => {
                options.no_overflow = true;
            }
            // Other
            "-t" | "--theme" => {
                i += 1;
                let theme = args.get(i).ok_or("Missing theme argument")?;
                options.theme = Some(theme.clone());
            }
            "-c" | "--config" => {
                i += 1;
                let path = args.get(i).ok_or("Missing config path")?;
                options.config_path = Some(PathBuf::from(path));
            }
            "--init-config" => {
                options.init_config = true;
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(Invocation::Run(options))
}

/// Merge command line options over the file configuration
fn apply_options(mut config: Config, options: &Options) -> Config {
    if let Some(ref theme) = options.theme {
        config.color_scheme = theme.clone();
    }
    if let Some(ms) = options.typing_speed_ms {
        config.animation.typing_speed_ms = ms;
    }
    if let Some(ms) = options.line_delay_ms {
        config.animation.line_delay_ms = ms;
    }
    if options.instant {
        config.animation = RevealTiming::instant().into();
    }
    if let Some(capacity) = options.capacity {
        config.overflow.capacity = Some(capacity);
    }
    if options.no_overflow {
        config.overflow.enabled = false;
    }
    config
}

/// Initialize logging to ~/.termfolio/termfolio.log
fn init_logging() {
    let home = std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from);

    let log_path = home
        .map(|h| h.join(".termfolio").join("termfolio.log"))
        .unwrap_or_else(|| PathBuf::from("termfolio.log"));

    // Create log directory if needed
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    // Open log file (append mode)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_env("TERMFOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Invocation::Run(options)) => options,
        Ok(Invocation::Help) => {
            print_help();
            return Ok(());
        }
        Ok(Invocation::Version) => {
            print_version();
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    init_logging();
    info!("termfolio {} starting...", VERSION);

    let file_config = match options.config_path {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load(),
    };
    let config = apply_options(file_config, &options);
    config.validate()?;

    if options.init_config {
        let path = config.save()?;
        eprintln!("Wrote {}", path.display());
        return Ok(());
    }

    run_terminal(&config)
}

/// Set up the session and the screen, run the loop, restore the terminal
fn run_terminal(config: &Config) -> anyhow::Result<()> {
    let timing: RevealTiming = config.timing();
    info!(
        "Theme: {}, typing {:?}/char, {:?}/line",
        config.color_scheme, timing.char_interval, timing.line_delay
    );

    let mut session = TerminalSession::new(CommandCatalog::new(), timing, config.overflow_guard());
    let mut panel = ButtonPanel::new(session.catalog());

    let mut renderer = Renderer::new(config.get_color_scheme());
    renderer.init()?;

    let result = run_main_loop(&mut session, &mut panel, &mut renderer, config);

    let _ = renderer.cleanup();
    result
}

/// Recompute screen regions and resize the guard if it follows the window
fn relayout(
    session: &mut TerminalSession,
    panel: &mut ButtonPanel,
    cols: u16,
    rows: u16,
    auto_capacity: bool,
) -> Layout {
    let layout = Layout::for_panel(cols, rows, panel);
    panel.layout(cols, layout.panel_y);
    if auto_capacity {
        session.guard_mut().set_capacity(layout.output_height as usize);
    }
    debug!("Layout {}x{}: {} output rows", cols, rows, layout.output_height);
    layout
}

/// Run a button action. Returns true if the panel changed shape.
fn apply_panel_action(session: &mut TerminalSession, panel: &mut ButtonPanel, action: PanelAction) -> bool {
    match action {
        PanelAction::Run(name) => {
            report(session.handle_command(name, Instant::now()));
            false
        }
        PanelAction::Clear => {
            session.clear();
            false
        }
        PanelAction::Toggle(parent) => {
            panel.toggle(parent);
            true
        }
    }
}

/// Edit the input line. Focus moves back to it only if the edit was accepted.
fn edit_input(session: &mut TerminalSession, panel: &mut ButtonPanel, action: KeyAction) {
    let accepted = match action {
        KeyAction::Insert(ch) => session.insert_char(ch),
        KeyAction::Backspace => session.backspace(),
        _ => false,
    };
    if accepted {
        panel.focus_input();
    }
}

fn report(result: crate::core::session::Result<Dispatch>) {
    match result {
        Ok(dispatch) => debug!("Dispatched: {:?}", dispatch),
        Err(e) => debug!("Ignored: {}", e),
    }
}

/// Main event loop
fn run_main_loop(
    session: &mut TerminalSession,
    panel: &mut ButtonPanel,
    renderer: &mut Renderer,
    config: &Config,
) -> anyhow::Result<()> {
    let auto_capacity = config.auto_capacity();
    let (mut cols, mut rows) = Renderer::size()?;
    info!("Terminal size: {}x{}", cols, rows);
    let mut layout = relayout(session, panel, cols, rows, auto_capacity);
    let mut dirty = true;

    loop {
        if session.poll(Instant::now()) {
            dirty = true;
        }

        if dirty {
            renderer.render(session, panel, &layout, &config.title)?;
            dirty = false;
        }

        // Sleep until input arrives or the next reveal step is due
        let timeout = session
            .next_deadline()
            .map(|due| due.saturating_duration_since(Instant::now()))
            .map_or(IDLE_POLL, |wait| wait.min(IDLE_POLL));

        if !event::poll(timeout)? {
            continue;
        }

        match event::read()? {
            Event::Key(key_event) => {
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                let Some(action) = KeyMapper::map(&key_event, panel.focus.is_some()) else {
                    continue;
                };
                match action {
                    KeyAction::Quit => {
                        info!("Quit requested");
                        break;
                    }
                    KeyAction::Insert(_) | KeyAction::Backspace => edit_input(session, panel, action),
                    KeyAction::Submit => report(session.submit(Instant::now())),
                    KeyAction::Activate => {
                        if let Some(action) = panel.activate_focused(session.is_busy()) {
                            if apply_panel_action(session, panel, action) {
                                layout = relayout(session, panel, cols, rows, auto_capacity);
                            }
                        }
                    }
                    KeyAction::FocusNext => panel.focus_next(),
                    KeyAction::FocusPrev => panel.focus_prev(),
                    KeyAction::Clear => session.clear(),
                    KeyAction::ScrollUp(n) => session.scroll_up(n, renderer.max_scroll()),
                    KeyAction::ScrollDown(n) => session.scroll_down(n),
                }
                dirty = true;
            }
            Event::Mouse(mouse_event) => match KeyMapper::map_mouse(&mouse_event) {
                Some(MouseAction::Click { col, row }) => {
                    if let Some(action) = panel.handle_click(col, row, session.is_busy()) {
                        if apply_panel_action(session, panel, action) {
                            layout = relayout(session, panel, cols, rows, auto_capacity);
                        }
                    } else if row == layout.input_y {
                        panel.focus_input();
                    }
                    dirty = true;
                }
                Some(MouseAction::Hover { col, row }) => {
                    if panel.update_hover(col, row) {
                        dirty = true;
                    }
                }
                Some(MouseAction::ScrollUp(n)) => {
                    session.scroll_up(n, renderer.max_scroll());
                    dirty = true;
                }
                Some(MouseAction::ScrollDown(n)) => {
                    session.scroll_down(n);
                    dirty = true;
                }
                None => {}
            },
            Event::Resize(new_cols, new_rows) => {
                cols = new_cols;
                rows = new_rows;
                layout = relayout(session, panel, cols, rows, auto_capacity);
                dirty = true;
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn options(items: &[&str]) -> Options {
        match parse_args(&args(items)) {
            Ok(Invocation::Run(options)) => options,
            other => panic!("expected options, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_defaults() {
        assert_eq!(options(&[]), Options::default());
    }

    #[test]
    fn test_parse_flags() {
        let opts = options(&["-t", "nord", "--speed", "10", "--capacity", "40", "--no-overflow"]);
        assert_eq!(opts.theme.as_deref(), Some("nord"));
        assert_eq!(opts.typing_speed_ms, Some(10));
        assert_eq!(opts.capacity, Some(40));
        assert!(opts.no_overflow);
        assert!(!opts.instant);
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(parse_args(&args(&["--speed", "5", "-h"])), Ok(Invocation::Help));
        assert_eq!(parse_args(&args(&["--version"])), Ok(Invocation::Version));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["--speed"])).is_err());
        assert!(parse_args(&args(&["--speed", "fast"])).is_err());
        assert!(parse_args(&args(&["--theme"])).is_err());
    }

    #[test]
    fn test_options_override_config() {
        let config = apply_options(Config::default(), &options(&["--instant", "--capacity", "12", "-t", "amber"]));
        assert_eq!(config.timing(), RevealTiming::instant());
        assert_eq!(config.overflow.capacity, Some(12));
        assert_eq!(config.color_scheme, "amber");
        assert!(!config.auto_capacity());

        let config = apply_options(Config::default(), &options(&["--no-overflow"]));
        assert!(!config.overflow_guard().is_active());
    }

    #[test]
    fn test_panel_actions() {
        let mut session = TerminalSession::new(CommandCatalog::new(), RevealTiming::instant(), Config::default().overflow_guard());
        let mut panel = ButtonPanel::new(session.catalog());

        assert!(apply_panel_action(&mut session, &mut panel, PanelAction::Toggle("work")));
        assert!(panel.is_expanded("work"));

        assert!(!apply_panel_action(&mut session, &mut panel, PanelAction::Run("work 2")));
        assert!(session.is_busy());
        // Busy: a second command is ignored, clear still works.
        apply_panel_action(&mut session, &mut panel, PanelAction::Run("help"));
        assert_eq!(session.output().lines()[0], "> work 2");
        apply_panel_action(&mut session, &mut panel, PanelAction::Clear);
        assert!(session.output().is_empty());

        session.run_to_idle();
        assert!(!session.is_busy());
    }

    #[test]
    fn test_typing_while_busy_keeps_button_focus() {
        let mut session = TerminalSession::new(CommandCatalog::new(), RevealTiming::default(), Config::default().overflow_guard());
        let mut panel = ButtonPanel::new(session.catalog());

        session.handle_command("help", Instant::now()).unwrap();
        panel.focus = Some(2);
        edit_input(&mut session, &mut panel, KeyAction::Insert('x'));
        edit_input(&mut session, &mut panel, KeyAction::Backspace);
        assert_eq!(panel.focus, Some(2));
        assert_eq!(session.input(), "");

        session.run_to_idle();
        edit_input(&mut session, &mut panel, KeyAction::Insert('h'));
        assert_eq!(panel.focus, None);
        assert_eq!(session.input(), "h");
    }

    #[test]
    fn test_relayout_sets_auto_capacity() {
        let mut session = TerminalSession::new(CommandCatalog::new(), RevealTiming::instant(), Config::default().overflow_guard());
        let mut panel = ButtonPanel::new(session.catalog());
        let layout = relayout(&mut session, &mut panel, 120, 40, true);
        assert_eq!(session.guard().capacity(), layout.output_height as usize);
        assert!(session.guard().is_active());
        assert_eq!(panel.buttons[0].y, layout.panel_y);

        let layout = relayout(&mut session, &mut panel, 120, 30, false);
        assert_ne!(session.guard().capacity(), layout.output_height as usize);
    }
}
