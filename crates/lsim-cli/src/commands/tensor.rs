use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use lsim_tensor::{digest, load_with_layout, save_with_layout, HeaderLayout, TensorSummary};
use serde::Serialize;
use tracing::info;

#[derive(Args, Debug)]
pub struct TensorArgs {
    #[command(subcommand)]
    pub command: TensorCommand,
}

#[derive(Subcommand, Debug)]
pub enum TensorCommand {
    /// Print shape, rank, element count and SHA-256 of a tensor file.
    Info(InfoArgs),
    /// Load a tensor and save it again; formats follow the file extensions.
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Tensor file (`.f64`/`.f32` binary, anything else text).
    pub path: PathBuf,
    /// Emit JSON instead of plain text.
    #[arg(long)]
    pub json: bool,
    /// Read a binary file written with the native-width header.
    #[arg(long)]
    pub native: bool,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Source tensor file.
    pub input: PathBuf,
    /// Destination tensor file.
    pub output: PathBuf,
    /// Read the source with the native-width header.
    #[arg(long = "native-in")]
    pub native_in: bool,
    /// Write the destination with the native-width header.
    #[arg(long)]
    pub native: bool,
}

#[derive(Debug, Serialize)]
struct InfoReport {
    path: String,
    #[serde(flatten)]
    summary: TensorSummary,
    sha256: String,
}

pub fn run(args: &TensorArgs) -> Result<(), Box<dyn Error>> {
    match &args.command {
        TensorCommand::Info(info) => run_info(info),
        TensorCommand::Convert(convert) => run_convert(convert),
    }
}

fn layout(native: bool) -> HeaderLayout {
    if native {
        HeaderLayout::Native
    } else {
        HeaderLayout::Fixed64
    }
}

fn run_info(args: &InfoArgs) -> Result<(), Box<dyn Error>> {
    let tensor = load_with_layout(&args.path, layout(args.native))?;
    let report = InfoReport {
        path: args.path.display().to_string(),
        summary: tensor.summary(),
        sha256: digest(&tensor)?,
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("path:     {}", report.path);
        println!("shape:    {:?}", report.summary.shape);
        println!("rank:     {}", report.summary.rank);
        println!("elements: {}", report.summary.element_count);
        println!("sha256:   {}", report.sha256);
    }
    Ok(())
}

fn run_convert(args: &ConvertArgs) -> Result<(), Box<dyn Error>> {
    let tensor = load_with_layout(&args.input, layout(args.native_in))?;
    save_with_layout(&tensor, &args.output, layout(args.native))?;
    info!(
        from = %args.input.display(),
        to = %args.output.display(),
        elements = tensor.len(),
        "converted tensor"
    );
    Ok(())
}
