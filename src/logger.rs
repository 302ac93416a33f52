//! Terminal output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - [`Printer`] for indented status lines (one per built file)
//!
//! # Example
//!
//! ```ignore
//! log!("serve"; "http://{}", addr);
//!
//! let mut printer = Printer::stdout();
//! printer.echo("OK: index.html");
//! printer.final_echo();
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{self, Stdout, Write, stdout},
    sync::OnceLock,
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Length of brackets around module name: "[]"
const BRACKET_LEN: usize = 2;
/// Space after prefix: "[module] " <- this space
const SPACE_AFTER_PREFIX: usize = 1;

/// Indentation of every [`Printer`] line.
const INDENT: &str = "  ";

/// Calculate total prefix length for a module name.
#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + BRACKET_LEN + SPACE_AFTER_PREFIX
}

/// Get terminal width, cached after first call.
/// Falls back to 120 columns if detection fails.
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a message with a colored module prefix.
///
/// Automatically truncates long messages to fit terminal width.
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);
    let width = get_terminal_width() as usize;

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();

    let max_msg_len = width.saturating_sub(calc_prefix_len(module.len()));
    let message = truncate_str(message, max_msg_len);

    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "serve" => prefix.bright_blue().bold(),
        "build" => prefix.bright_green().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate a string to fit within max_len bytes.
///
/// Ensures the result is valid UTF-8 by finding the nearest character boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Printer
// ============================================================================

/// Writes indented status lines, framed by blank lines.
///
/// The first [`echo`](Printer::echo) is preceded by an empty line, and
/// [`final_echo`](Printer::final_echo) closes the block only if anything was
/// printed.
#[derive(Debug)]
pub struct Printer<W: Write = Stdout> {
    out: W,
    printed: bool,
}

impl Printer {
    pub fn stdout() -> Self {
        Self::new(stdout())
    }
}

impl<W: Write> Printer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: false,
        }
    }

    /// Print `message`, indenting every line.
    pub fn echo(&mut self, message: &str) -> io::Result<()> {
        if !self.printed {
            writeln!(self.out)?;
            self.printed = true;
        }
        for line in message.lines() {
            writeln!(self.out, "{INDENT}{line}")?;
        }
        self.out.flush()
    }

    /// Close the block with an empty line if anything was printed.
    pub fn final_echo(&mut self) -> io::Result<()> {
        if self.printed {
            writeln!(self.out)?;
            self.out.flush()?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn has_printed(&self) -> bool {
        self.printed
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

// ============================================================================
// Tests
// ============================================================================
