//! Shared CLI output helpers for consistent terminal output.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, checkmarks
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: paths, entries, keys, hints
//! - Bold: headers, important values
//! - Dimmed: secondary info

use std::fmt::Display;

use console::{style, StyledObject};

const RULE_WIDTH: usize = 56;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

fn paint<D>(value: D) -> StyledObject<D> {
    let styled = style(value);
    if colors_enabled() {
        styled
    } else {
        styled.force_styling(false)
    }
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ re-encrypted 3 entries`
pub fn success(msg: &str) {
    println!("{} {}", paint("✓").green(), msg);
}

/// Print an error message to stderr (red).
pub fn error(msg: &str) {
    eprintln!("{} {}", paint("✗").red(), msg);
}

/// Print a warning message to stderr (yellow).
///
/// Example: `⚠ git commit exited with status 1`
pub fn warn(msg: &str) {
    eprintln!("{} {}", paint("⚠").yellow(), msg);
}

/// Print a hint message to stderr (cyan).
///
/// Example: `→ run: passkeep init <key-id>`
pub fn hint(msg: &str) {
    eprintln!("{} {}", paint("→").cyan(), paint(msg).cyan());
}

/// Print dimmed detail under a warning or error, to stderr.
pub fn detail(msg: &str) {
    for line in msg.lines() {
        eprintln!("  {}", paint(line).dim());
    }
}

/// Print a bold section header.
pub fn header(title: &str) {
    println!("{}", paint(title).bold());
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  scanned:  12`
pub fn kv(label: &str, value: impl Display) {
    println!("  {}  {}", paint(label).dim(), paint(value.to_string()).bold());
}

/// Print a list item with bullet.
pub fn list_item(item: &str) {
    println!("  • {}", item);
}

/// Print a horizontal rule separator.
pub fn rule() {
    println!("{}", paint("─".repeat(RULE_WIDTH)).dim());
}

/// Format a path in cyan for inline use.
pub fn path(p: impl Display) -> String {
    paint(p.to_string()).cyan().to_string()
}

/// Format an entry name in cyan for inline use.
pub fn entry(name: &str) -> String {
    paint(name).cyan().to_string()
}

/// Format a key id in cyan for inline use.
pub fn key(k: &str) -> String {
    paint(k).cyan().to_string()
}

/// Print a dimmed/secondary message.
///
/// Example: `store is empty`
pub fn dimmed(msg: &str) {
    println!("{}", paint(msg).dim());
}

/// Print a section header with a separator line.
pub fn section(title: &str) {
    println!();
    header(title);
    rule();
}
