use std::error::Error;
use std::path::Path;

use clap::Args;
use lsim_stage::{discover_inputs, FileRange};

use super::ConfigSource;

#[derive(Args, Debug)]
pub struct InputsArgs {
    #[command(flatten)]
    pub source: ConfigSource,
}

pub fn run(args: &InputsArgs) -> Result<(), Box<dyn Error>> {
    let config = args.source.build()?;
    let range = FileRange::parse(&config.file_range);
    let files = discover_inputs(Path::new(&config.in_folder), &config.in_prefix, &range)?;
    for file in files {
        println!("{}", file.display());
    }
    Ok(())
}
