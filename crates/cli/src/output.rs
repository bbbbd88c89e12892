//! Terminal output for `lb`.
//!
//! Status lines carry a short tag (`done:`, `note:`, `warning:`, `error:`);
//! results go to stdout and problems to stderr so `--output json` stays
//! parseable.

use std::fmt::Display;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
  Done,
  Note,
  Warn,
  Fail,
}

impl Tone {
  fn tag(self) -> &'static str {
    match self {
      Tone::Done => "done:",
      Tone::Note => "note:",
      Tone::Warn => "warning:",
      Tone::Fail => "error:",
    }
  }
}

/// Print one tagged status line.
pub fn say(tone: Tone, message: &str) {
  let tag = tone.tag();
  match tone {
    Tone::Done => println!("{} {}", tag.if_supports_color(Stream::Stdout, |t| t.green()), message),
    Tone::Note => println!("{} {}", tag.if_supports_color(Stream::Stdout, |t| t.blue()), message),
    Tone::Warn => eprintln!("{} {}", tag.if_supports_color(Stream::Stderr, |t| t.yellow()), message),
    Tone::Fail => eprintln!(
      "{} {}",
      tag.if_supports_color(Stream::Stderr, |t| t.red().bold().to_string()),
      message.if_supports_color(Stream::Stderr, |m| m.red())
    ),
  }
}

/// Label/value rows printed with the values lined up.
#[derive(Debug, Default)]
pub struct Summary {
  indent: usize,
  rows: Vec<(String, String)>,
}

impl Summary {
  pub fn new() -> Self {
    Self { indent: 2, rows: Vec::new() }
  }

  pub fn indented(indent: usize) -> Self {
    Self { indent, rows: Vec::new() }
  }

  pub fn row(mut self, label: &str, value: impl Display) -> Self {
    self.rows.push((format!("{}:", label), value.to_string()));
    self
  }

  pub fn render(&self) -> String {
    let width = self.rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (label, value) in &self.rows {
      let padded = format!("{:<width$}", label, width = width);
      out.push_str(&format!(
        "{:indent$}{} {}\n",
        "",
        padded.if_supports_color(Stream::Stdout, |l| l.dimmed()),
        value,
        indent = self.indent
      ));
    }
    out
  }

  pub fn print(&self) {
    print!("{}", self.render());
  }
}

/// Binary-prefixed size, e.g. `1.5 KiB`.
pub fn human_size(bytes: u64) -> String {
  const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

  if bytes < 1024 {
    return format!("{} B", bytes);
  }
  let mut value = bytes as f64 / 1024.0;
  let mut unit = 0;
  while value >= 1024.0 && unit + 1 < UNITS.len() {
    value /= 1024.0;
    unit += 1;
  }
  format!("{:.1} {}", value, UNITS[unit])
}

/// Build timings: milliseconds below a second, else seconds with two decimals.
pub fn elapsed(duration: Duration) -> String {
  if duration < Duration::from_secs(1) {
    format!("{} ms", duration.as_millis())
  } else {
    format!("{:.2} s", duration.as_secs_f64())
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Render an error and its causes on one line, skipping causes whose text the
/// outer message already includes.
pub fn format_error(err: &anyhow::Error) -> String {
  let mut message = err.to_string();
  for cause in err.chain().skip(1) {
    let cause = cause.to_string();
    if !message.contains(&cause) {
      message.push_str(": ");
      message.push_str(&cause);
    }
  }
  message
}
