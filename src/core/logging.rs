//! Terminal and File Logging
//!
//! Provides:
//! - Structured JSON log files with daily rotation (tracing-appender)
//! - Human-readable stderr logging, filtered by `RUST_LOG`
//! - `log` macro capture so library code logs through `tracing`
//! - Gzip compression of rotated log files
//! - miette error reporting and styled console messages (console)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use console::{style, Term};
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

/// Base name of the rolling log file.
pub const LOG_FILE_PREFIX: &str = "npcforge.log";

static TERMINAL_CAPS: OnceLock<TerminalCapabilities> = OnceLock::new();

fn get_terminal_caps() -> &'static TerminalCapabilities {
    TERMINAL_CAPS.get_or_init(TerminalCapabilities::detect)
}

// ============================================================================
// Terminal Capability Detection
// ============================================================================

/// Detected terminal capabilities
#[derive(Debug, Clone)]
pub struct TerminalCapabilities {
    pub supports_unicode: bool,
    pub is_interactive: bool,
    pub width: u16,
}

impl TerminalCapabilities {
    /// Detect terminal capabilities from environment
    pub fn detect() -> Self {
        let term = Term::stdout();
        let is_interactive = term.is_term();
        let width = term.size().1;

        // Unicode support heuristic
        let supports_unicode = std::env::var("TERM")
            .map(|t| !t.contains("dumb"))
            .unwrap_or(true)
            && std::env::var("LANG")
                .map(|l| l.contains("UTF-8") || l.contains("utf8"))
                .unwrap_or(true);

        Self {
            supports_unicode,
            is_interactive,
            width,
        }
    }

    /// Check if colors should be used
    pub fn should_colorize(&self) -> bool {
        self.is_interactive && console::colors_enabled()
    }
}

// ============================================================================
// Logging Initialization
// ============================================================================

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize the logging system.
///
/// This sets up:
/// 1. A stderr logger, so command output on stdout stays clean.
/// 2. A JSON file logger under `log_dir` with daily rotation.
/// 3. Redirects standard `log` crate events to `tracing`.
/// 4. Configures miette for error reporting.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the
/// process so buffered logs are flushed on shutdown.
pub fn init(log_dir: &Path, verbose: bool) -> WorkerGuard {
    if let Err(e) = fs::create_dir_all(log_dir) {
        eprintln!("Failed to create logs directory {}: {}", log_dir.display(), e);
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter("debug"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .compact()
        .with_target(false)
        .with_filter(env_filter(if verbose { "debug" } else { "info" }));

    let subscriber = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer);
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }

    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {}", e);
    }

    init_miette();

    // Compress old logs in background, after logging is up so failures are recorded
    let log_dir_owned = log_dir.to_path_buf();
    std::thread::spawn(move || {
        compress_old_logs(&log_dir_owned);
    });

    log::debug!(
        "Logging initialized. Writing to: {} (daily rolling)",
        log_dir.join(LOG_FILE_PREFIX).display()
    );

    guard
}

/// Gzip rotated log files other than today's. Returns the number compressed.
pub fn compress_old_logs(log_dir: &Path) -> usize {
    let today_suffix = chrono::Local::now().format("%Y-%m-%d").to_string();
    let rotated_prefix = format!("{LOG_FILE_PREFIX}.");

    let Ok(entries) = fs::read_dir(log_dir) else {
        return 0;
    };

    let mut compressed = 0;
    for path in entries.flatten().map(|e| e.path()) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let should_compress = name.starts_with(&rotated_prefix)
            && !name.ends_with(&today_suffix)
            && !name.ends_with(".gz");
        if !should_compress {
            continue;
        }
        match compress_file(&path) {
            Ok(()) => {
                compressed += 1;
                log::info!("Compressed old log: {}", path.display());
            }
            Err(e) => log::warn!("Failed to compress old log {}: {}", path.display(), e),
        }
    }
    compressed
}

fn compress_file(path: &Path) -> io::Result<()> {
    let file = fs::File::open(path)?;
    let mut reader = io::BufReader::new(file);

    let mut gz_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No filename"))?
        .to_os_string();
    gz_name.push(".gz");
    let gz_path: PathBuf = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No parent directory"))?
        .join(gz_name);

    // Skip if already exists
    if gz_path.exists() {
        return Ok(());
    }

    let output = fs::File::create(&gz_path)?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;
    Ok(())
}

/// Initialize miette for error reporting
fn init_miette() {
    let caps = get_terminal_caps();

    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(caps.supports_unicode)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .color(caps.should_colorize())
                .build(),
        )
    }))
    .ok(); // Ignore if already set
}

// ============================================================================
// Console Output Utilities
// ============================================================================

fn symbol(unicode: &'static str, ascii: &'static str) -> &'static str {
    if get_terminal_caps().supports_unicode {
        unicode
    } else {
        ascii
    }
}

/// Print a styled panel with title and content
pub fn print_panel(title: &str, content: &str) {
    let caps = get_terminal_caps();
    let width = (caps.width as usize).clamp(20, 80);

    let border_char = symbol("─", "-");
    let side = symbol("│", "|");

    let title_display = format!(" {} ", title);
    let border_len = width
        .saturating_sub(title_display.chars().count())
        .saturating_sub(2)
        .max(1);
    println!(
        "{}{}{}{}",
        style(symbol("╭", "+")).cyan(),
        style(&title_display).cyan().bold(),
        style(border_char.repeat(border_len)).cyan(),
        style(symbol("╮", "+")).cyan()
    );

    let content_width = width.saturating_sub(4).max(1);
    for line in content.lines() {
        let padded = format!("{:width$}", line, width = content_width);
        println!("{} {} {}", style(side).cyan(), padded, style(side).cyan());
    }

    println!(
        "{}{}{}",
        style(symbol("╰", "+")).cyan(),
        style(border_char.repeat(width.saturating_sub(2).max(1))).cyan(),
        style(symbol("╯", "+")).cyan()
    );
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", style(symbol("✔", "[ok]")).green(), style(message).green());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", style(symbol("✖", "[x]")).red(), style(message).red().bold());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!(
        "{} {}",
        style(symbol("⚠", "[!]")).yellow(),
        style(message).yellow().bold()
    );
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", style(symbol("ℹ", "[i]")).blue(), style(message).blue());
}

// ============================================================================
// Tests
// ============================================================================
