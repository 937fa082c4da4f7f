//! Sequential invocation of the external stages.
//!
//! Every stage is started as `<exe> -f <parameter file>`, blocks until it
//! exits, and has its standard output copied into a per-stage log inside
//! `out_folder`. Exit codes are inspected; [`FailurePolicy`] decides whether
//! a failing stage stops the run.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Component, Path, PathBuf};
use std::process::{Command, Stdio};

use lsim_core::errors::{ErrorInfo, LsimError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::StageConfig;
use crate::serialize;

/// External computational steps, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Two-time correlation matrix.
    Correlation,
    /// Memory kernel and drift.
    Kernel,
    /// Fluctuating forces.
    FluctuatingForce,
    /// Trajectory simulation.
    Simulation,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 4] = [
        Stage::Correlation,
        Stage::Kernel,
        Stage::FluctuatingForce,
        Stage::Simulation,
    ];

    /// Short label used in logs.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Correlation => "correlation",
            Stage::Kernel => "kernel",
            Stage::FluctuatingForce => "fluctuating-force",
            Stage::Simulation => "simulation",
        }
    }

    /// Log file name inside `out_folder`.
    pub fn log_file_name(self) -> &'static str {
        match self {
            Stage::Correlation => "corr_log.txt",
            Stage::Kernel => "kernel_log.txt",
            Stage::FluctuatingForce => "ff_log.txt",
            Stage::Simulation => "sim_log.txt",
        }
    }

    /// Executable configured for this stage.
    pub fn executable(self, config: &StageConfig) -> &str {
        match self {
            Stage::Correlation => &config.corr_exe,
            Stage::Kernel => &config.kernel_exe,
            Stage::FluctuatingForce => &config.ff_exe,
            Stage::Simulation => &config.sim_exe,
        }
    }
}

/// Everything needed to start one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageInvocation {
    /// Stage being run.
    pub stage: Stage,
    /// Program to start.
    pub executable: PathBuf,
    /// Parameter file passed via `-f`.
    pub parameter_file: PathBuf,
    /// Destination of the captured standard output.
    pub log_path: PathBuf,
}

/// Result of one finished stage process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOutcome {
    /// Stage that ran.
    pub stage: Stage,
    /// Exit code; `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard output.
    pub log_path: PathBuf,
}

impl StageOutcome {
    /// Returns `true` for a zero exit code.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Starts stage processes.
pub trait StageRunner {
    /// Runs one stage to completion.
    ///
    /// Errors are reserved for stages that could not be started at all; a
    /// stage that ran and failed is reported through its exit code.
    fn run(&mut self, invocation: &StageInvocation) -> Result<StageOutcome, LsimError>;
}

/// Runs stages as child processes, copying their output into the log file
/// and, when `echo` is set, to this process's standard output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessRunner {
    /// Mirror stage output on stdout.
    pub echo: bool,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self { echo: true }
    }
}

impl StageRunner for ProcessRunner {
    fn run(&mut self, invocation: &StageInvocation) -> Result<StageOutcome, LsimError> {
        let mut log = File::create(&invocation.log_path)
            .map_err(|err| LsimError::from_write("stage.log", &invocation.log_path, &err))?;
        let mut child = Command::new(&invocation.executable)
            .arg("-f")
            .arg(&invocation.parameter_file)
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|err| spawn_error(invocation, &err))?;
        if let Some(stdout) = child.stdout.take() {
            if let Err(err) = self.copy_output(stdout, &mut log, invocation) {
                // Reap the child before reporting.
                let _ = child.kill();
                let _ = child.wait();
                return Err(err);
            }
        }
        let status = child.wait().map_err(|err| spawn_error(invocation, &err))?;
        Ok(StageOutcome {
            stage: invocation.stage,
            exit_code: status.code(),
            log_path: invocation.log_path.clone(),
        })
    }
}

impl ProcessRunner {
    fn copy_output(
        &self,
        stdout: impl io::Read,
        log: &mut File,
        invocation: &StageInvocation,
    ) -> Result<(), LsimError> {
        let console = io::stdout();
        let mut console = console.lock();
        let mut echo = self.echo;
        for line in BufReader::new(stdout).split(b'\n') {
            let mut line = line.map_err(|err| spawn_error(invocation, &err))?;
            line.push(b'\n');
            log.write_all(&line)
                .map_err(|err| LsimError::from_write("stage.log", &invocation.log_path, &err))?;
            if echo {
                if let Err(err) = console.write_all(&line) {
                    debug!(
                        stage = invocation.stage.label(),
                        error = %err,
                        "stdout echo failed, output continues to the log only"
                    );
                    echo = false;
                }
            }
        }
        if echo {
            let _ = console.flush();
        }
        Ok(())
    }
}

fn spawn_error(invocation: &StageInvocation, err: &io::Error) -> LsimError {
    LsimError::StageFailed(
        ErrorInfo::new("stage.spawn", err.to_string())
            .with_context("stage", invocation.stage.label())
            .with_context("executable", invocation.executable.display().to_string()),
    )
}

/// What to do when a stage exits unsuccessfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failing stage and return [`LsimError::StageFailed`].
    #[default]
    FailFast,
    /// Run every planned stage and report all outcomes.
    ContinueOnError,
}

/// Outcomes of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Parameter file handed to every stage.
    pub parameter_file: PathBuf,
    /// One outcome per executed stage, in order.
    pub outcomes: Vec<StageOutcome>,
}

impl PipelineReport {
    /// Returns `true` when every executed stage succeeded.
    pub fn succeeded(&self) -> bool {
        self.outcomes.iter().all(StageOutcome::success)
    }

    /// Stages that exited unsuccessfully.
    pub fn failures(&self) -> impl Iterator<Item = &StageOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.success())
    }
}

/// Stages run for `config`: correlation and kernel always, fluctuating
/// forces when enabled, simulation when `num_sim > 0`.
pub fn plan(config: &StageConfig) -> Vec<Stage> {
    Stage::ALL
        .into_iter()
        .filter(|stage| match stage {
            Stage::Correlation | Stage::Kernel => true,
            Stage::FluctuatingForce => config.fluctuating_force,
            Stage::Simulation => config.num_sim > 0,
        })
        .collect()
}

/// Lexically normalizes a path: drops `.` and folds `..` into a preceding
/// normal component.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().map(|c| c.as_os_str()).collect()
}

/// Writes the parameter file and runs the planned stages in order.
///
/// `out_folder` and `in_folder` are normalized and `out_folder` is created
/// before anything runs.
pub fn run_pipeline(
    config: &StageConfig,
    runner: &mut dyn StageRunner,
    policy: FailurePolicy,
) -> Result<PipelineReport, LsimError> {
    let mut config = config.clone();
    config.out_folder = normalize_path(Path::new(&config.out_folder))
        .display()
        .to_string();
    config.in_folder = normalize_path(Path::new(&config.in_folder))
        .display()
        .to_string();
    let out_dir = PathBuf::from(&config.out_folder);
    fs::create_dir_all(&out_dir)
        .map_err(|err| LsimError::from_write("stage.mkdir", &out_dir, &err))?;
    let parameter_file = config.parameter_file_path();
    serialize::write(&config, &parameter_file)?;

    let mut outcomes = Vec::new();
    for stage in plan(&config) {
        let invocation = StageInvocation {
            stage,
            executable: PathBuf::from(stage.executable(&config)),
            parameter_file: parameter_file.clone(),
            log_path: out_dir.join(stage.log_file_name()),
        };
        info!(
            stage = stage.label(),
            executable = %invocation.executable.display(),
            "starting stage"
        );
        let outcome = runner.run(&invocation)?;
        if outcome.success() {
            info!(stage = stage.label(), "stage finished");
        } else {
            warn!(
                stage = stage.label(),
                exit_code = ?outcome.exit_code,
                log = %outcome.log_path.display(),
                "stage failed"
            );
            if policy == FailurePolicy::FailFast {
                let code = outcome
                    .exit_code
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "signal".into());
                return Err(LsimError::StageFailed(
                    ErrorInfo::new("stage.exit", format!("{} stage failed", stage.label()))
                        .with_context("stage", stage.label())
                        .with_context("exit_code", code)
                        .with_context("log", outcome.log_path.display().to_string())
                        .with_hint("rerun with --continue-on-error to run the remaining stages"),
                ));
            }
        }
        outcomes.push(outcome);
    }
    Ok(PipelineReport {
        parameter_file,
        outcomes,
    })
}
