use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use lsim_stage::{serialize, write};
use tracing::info;

use super::ConfigSource;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write the parameter file (default `<out_folder>/parameter.txt`).
    Write(WriteArgs),
    /// Print the parameter file to stdout.
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    #[command(flatten)]
    pub source: ConfigSource,
    /// Destination instead of `<out_folder>/parameter.txt`.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: ConfigSource,
    /// Print JSON instead of the parameter file format.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &ConfigArgs) -> Result<(), Box<dyn Error>> {
    match &args.command {
        ConfigCommand::Write(write_args) => {
            let config = write_args.source.build()?;
            let path = write_args
                .out
                .clone()
                .unwrap_or_else(|| config.parameter_file_path());
            write(&config, &path)?;
            info!(path = %path.display(), "parameter file written");
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommand::Show(show) => {
            let config = show.source.build()?;
            if show.json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                config.validate()?;
                print!("{}", serialize(&config));
            }
            Ok(())
        }
    }
}
