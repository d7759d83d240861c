//! Herald - stderr logging for the scout workspace
//!
//! Every crate in the workspace logs through the same small set of
//! level functions. Output goes to stderr so stdout stays reserved for
//! command results and piping.
//!
//! Standard levels: `info()`, `warn()`, `error()`, `debug()`, `success()`,
//! plus `verbose()` for chatter that only matters when debugging.
//! Timestamped variants: `event_info()`, `event_warn()`, `event_error()`.

use chrono::Local;
use colored::*;

/// Write a message to stderr, one line at a time.
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

/// Build the padded, colored `[level]` prefix.
fn prefix(color: Color, level: &str) -> String {
  format!("[{}]{:<pad$}", level.color(color).bold(), "", pad = 6 - level.len())
}

pub fn verbose(message: &str) {
  emit(Color::Cyan, "verb", message);
}

/// General progress information.
pub fn info(message: &str) {
  emit(Color::Blue, "info", message);
}

/// Something needs attention but the operation continues.
pub fn warn(message: &str) {
  emit(Color::Yellow, "warn", message);
}

/// Something went wrong.
pub fn error(message: &str) {
  emit(Color::Red, "error", message);
}

/// Diagnostic detail.
pub fn debug(message: &str) {
  emit(Color::Magenta, "debug", message);
}

/// An operation completed successfully.
pub fn success(message: &str) {
  emit(Color::Green, "done", message);
}

fn emit(color: Color, level: &str, message: &str) {
  let prefix = prefix(color, level);
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

fn emit_event(color: Color, level: &str, message: &str) {
  let stamp = Local::now().format("%H:%M:%S").to_string();
  let prefix = format!("[{}] [{}]", level.color(color).bold(), stamp.cyan());
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// Timestamped info event.
pub fn event_info(message: &str) {
  emit_event(Color::Blue, "event", message);
}

/// Timestamped warning event.
pub fn event_warn(message: &str) {
  emit_event(Color::Yellow, "event", message);
}

/// Timestamped error event.
pub fn event_error(message: &str) {
  emit_event(Color::Red, "event", message);
}

#[macro_export]
macro_rules! verbose {
  ($msg:expr) => {
    $crate::verbose($msg)
  };
}

#[macro_export]
macro_rules! info {
  ($msg:expr) => {
    $crate::info($msg)
  };
}

#[macro_export]
macro_rules! warn {
  ($msg:expr) => {
    $crate::warn($msg)
  };
}

#[macro_export]
macro_rules! error {
  ($msg:expr) => {
    $crate::error($msg)
  };
}

#[macro_export]
macro_rules! debug {
  ($msg:expr) => {
    $crate::debug($msg)
  };
}

#[macro_export]
macro_rules! success {
  ($msg:expr) => {
    $crate::success($msg)
  };
}
