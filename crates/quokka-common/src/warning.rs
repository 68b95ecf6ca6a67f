//! Parser warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple
//! times. Used by the HTML and DOM components to report surprising (but
//! recovered) constructs. Warnings are developer diagnostics only; they
//! never affect parse output and are distinct from the parse-error list
//! handed back to callers.

use std::collections::HashSet;
use std::sync::{LazyLock, Mutex};

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Warnings we've already printed, kept to deduplicate.
static WARNED: LazyLock<Mutex<HashSet<String>>> = LazyLock::new(|| Mutex::new(HashSet::new()));

/// Warn about a surprising construct (prints once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("HTML Parser", "ignoring <frameset> after body content");
/// ```
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let first_time = WARNED.lock().unwrap().insert(key);

    if first_time {
        eprintln!("{YELLOW}[Quokka {component}] ⚠ {message}{RESET}");
    }
}

/// Clear all recorded warnings (call when starting a fresh document).
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn clear_warnings() {
    WARNED.lock().unwrap().clear();
}

#[cfg(test)]
mod tests {
    use super::{clear_warnings, warn_once};

    #[test]
    fn warn_once_deduplicates_without_panicking() {
        warn_once("Test", "same message");
        warn_once("Test", "same message");
        clear_warnings();
        warn_once("Test", "same message");
    }
}
