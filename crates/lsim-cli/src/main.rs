use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    config::{self, ConfigArgs},
    inputs::{self, InputsArgs},
    params::{self, ParamsArgs},
    run::{self, RunArgs},
    tensor::{self, TensorArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "lsim", version, about = "Langevin pipeline driver and data tools")]
struct Cli {
    /// Raise the log level to debug (twice for trace). `RUST_LOG` wins when set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect or convert tensor files.
    Tensor(TensorArgs),
    /// Resolve a parameter file with command-line overrides and print it.
    Params(ParamsArgs),
    /// Produce the stage parameter file from defaults, a run file and overrides.
    Config(ConfigArgs),
    /// List the input trajectories a run would read.
    Inputs(InputsArgs),
    /// Run the stage pipeline.
    Run(RunArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Command::Tensor(args) => tensor::run(&args),
        Command::Params(args) => params::run(&args),
        Command::Config(args) => config::run(&args),
        Command::Inputs(args) => inputs::run(&args),
        Command::Run(args) => run::run(&args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
