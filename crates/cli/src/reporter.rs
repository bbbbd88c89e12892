//! Colored progress lines for interactive builds.

use owo_colors::{OwoColorize, Stream};

use littlebuild_lib::reporter::{BuildEvent, Reporter, render_command};

/// Prints actions to stdout and problems to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalReporter;

impl Reporter for TerminalReporter {
  fn report(&self, event: BuildEvent<'_>) {
    match event {
      BuildEvent::UpToDate { artifact } => println!(
        "{} {}",
        artifact.display(),
        "-> nothing to do!".if_supports_color(Stream::Stdout, |s| s.blue())
      ),
      BuildEvent::Running { program, args } => println!(
        "{} {}",
        "COMMAND:".if_supports_color(Stream::Stdout, |s| s.green()),
        render_command(program, args)
      ),
      BuildEvent::Generated { artifact } => println!(
        "{} {}",
        "GENERATED:".if_supports_color(Stream::Stdout, |s| s.green()),
        artifact.display()
      ),
      BuildEvent::Removed { path } => println!(
        "{} {}",
        "REMOVED:".if_supports_color(Stream::Stdout, |s| s.dimmed()),
        path.display()
      ),
      BuildEvent::Skipped { path, reason } => eprintln!(
        "{} {} ({})",
        "SKIPPED:".if_supports_color(Stream::Stderr, |s| s.yellow()),
        path.display(),
        reason
      ),
      BuildEvent::Failed { subject, detail } => {
        eprintln!(
          "{} {}",
          "FAILED:".if_supports_color(Stream::Stderr, |s| s.red()),
          subject.display()
        );
        let detail = detail.trim_end();
        if !detail.is_empty() {
          eprintln!("{}", detail.if_supports_color(Stream::Stderr, |s| s.red()));
        }
      }
    }
  }
}
