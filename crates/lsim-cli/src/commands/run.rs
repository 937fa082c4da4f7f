use std::error::Error;
use std::process;

use clap::Args;
use lsim_stage::{run_pipeline, FailurePolicy, ProcessRunner};
use tracing::{error, info};

use super::ConfigSource;

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: ConfigSource,
    /// Keep running the remaining stages after one fails.
    #[arg(long = "continue-on-error")]
    pub continue_on_error: bool,
    /// Do not mirror stage output on stdout; it still goes to the stage logs.
    #[arg(long)]
    pub quiet: bool,
    /// Print the pipeline report as JSON when done.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let config = args.source.build()?;
    let policy = if args.continue_on_error {
        FailurePolicy::ContinueOnError
    } else {
        FailurePolicy::FailFast
    };
    let mut runner = ProcessRunner { echo: !args.quiet };
    let report = run_pipeline(&config, &mut runner, policy)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    if report.succeeded() {
        info!(stages = report.outcomes.len(), "pipeline finished");
        return Ok(());
    }
    for failure in report.failures() {
        error!(
            stage = failure.stage.label(),
            exit_code = ?failure.exit_code,
            log = %failure.log_path.display(),
            "stage failed"
        );
    }
    process::exit(1);
}
