use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dfii::simulator::config::{load_and_merge_configs, CliOverrides};
use dfii::simulator::log::init_log;
use dfii::{SimConfig, SimResult, Simulator};
use log::error;

/// dfii - DFI command injector simulator
#[derive(Parser, Debug)]
#[command(name = "dfii")]
#[command(version)]
#[command(about = "Drive a DFI injector model from register-level scripts", long_about = None)]
struct Args {
  /// TOML config merged over the built-in defaults
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Command script to run before (or instead of) the step shell
  #[arg(long, value_name = "FILE")]
  script: Option<PathBuf>,

  /// Enable step mode (interactive shell)
  #[arg(short, long)]
  step: bool,

  /// Quiet mode (warnings and errors only)
  #[arg(short, long)]
  quiet: bool,

  /// JSON-lines trace of the downstream port
  #[arg(long, value_name = "FILE")]
  trace_file: Option<String>,

  /// Number of DFI phases
  #[arg(long, value_name = "N")]
  nphases: Option<usize>,

  /// Number of ranks
  #[arg(long, value_name = "N")]
  nranks: Option<usize>,
}

fn run(args: Args) -> SimResult<()> {
  let overrides = CliOverrides {
    quiet: args.quiet,
    step: args.step,
    trace_file: args.trace_file,
    nphases: args.nphases,
    nranks: args.nranks,
  };
  let app_config = load_and_merge_configs(args.config.as_deref(), &overrides)?;
  let config = SimConfig::from_app_config(&app_config)?;

  let mut simulator = Simulator::new(config)?;
  simulator.run(args.script.as_deref())
}

fn main() -> ExitCode {
  init_log();

  let args = Args::parse();
  match run(args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      error!("{}", e);
      ExitCode::FAILURE
    }
  }
}
