mod cmd;
mod output;
mod reporter;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{cmd_build, cmd_clean, cmd_info, cmd_statics};
use crate::output::{OutputFormat, Tone, format_error, say};

/// lb - incremental builds for small C/C++ projects
#[derive(Parser)]
#[command(name = "lb")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Project file (default: $LITTLEBUILD_CONFIG, then ./littlebuild.toml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(long, global = true, value_enum, default_value = "text")]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate statics, then compile and link a target
  Build {
    /// Target name (default: project.default_target, else the first target)
    target: Option<String>,

    /// Skip archive and header generation
    #[arg(long)]
    no_statics: bool,
  },

  /// Refresh archives and regenerate stale asset headers
  Statics,

  /// Remove generated files
  #[command(alias = "clear")]
  Clean,

  /// Show the project and its targets
  Info,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let config = cli.config.as_deref();
  let result = match cli.command {
    Commands::Build { target, no_statics } => cmd_build(config, target.as_deref(), no_statics, cli.output),
    Commands::Statics => cmd_statics(config, cli.output),
    Commands::Clean => cmd_clean(config, cli.output),
    Commands::Info => cmd_info(config, cli.output),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      say(Tone::Fail, &format_error(&e));
      ExitCode::FAILURE
    }
  }
}
