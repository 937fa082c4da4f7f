pub mod config;
pub mod inputs;
pub mod params;
pub mod run;
pub mod tensor;

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use lsim_stage::StageConfig;
use tracing::debug;

/// Run file and override flags shared by commands that build a [`StageConfig`].
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigSource {
    /// YAML run file; keys it omits keep their defaults.
    #[arg(long = "from", value_name = "YAML")]
    pub from: Option<PathBuf>,
    /// Override one field, e.g. `--set num_sim=10`. Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

impl ConfigSource {
    /// Defaults, then the run file, then each `--set` in order.
    pub fn build(&self) -> Result<StageConfig, Box<dyn Error>> {
        let mut config = match &self.from {
            Some(path) => StageConfig::load_yaml(path)?,
            None => StageConfig::default(),
        };
        for assignment in &self.set {
            config.apply_override(assignment)?;
            debug!(assignment = %assignment, "applied override");
        }
        Ok(config)
    }
}
