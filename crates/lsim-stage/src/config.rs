use std::fs;
use std::path::{Path, PathBuf};

use lsim_core::errors::{ErrorInfo, LsimError};
use lsim_params::{parse_bool_strict, ParameterStore, ParameterValue};
use serde::{Deserialize, Serialize};

/// Parameters shared by every pipeline stage.
///
/// Field order is the order of [`FIELD_KEYS`] and of the lines written by
/// [`serialize`](crate::serialize::serialize).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Directory receiving every stage output and the parameter file.
    pub out_folder: String,
    /// Directory holding the input trajectories.
    pub in_folder: String,
    /// File name prefix of the input trajectories.
    pub in_prefix: String,
    /// Selected trajectory numbers, e.g. `0-99,200-299`.
    pub file_range: String,
    /// Number of observables per trajectory.
    pub num_obs: usize,
    /// Start of the evaluated time window.
    pub t_min: f64,
    /// End of the evaluated time window.
    pub t_max: f64,
    /// Use every `increment`-th time step.
    pub increment: usize,
    /// Subtract the average initial value.
    pub shift: bool,
    /// Run the fluctuating force stage.
    pub fluctuating_force: bool,
    /// Number of simulated trajectories; zero skips the simulation stage.
    pub num_sim: usize,
    /// Additionally write text outputs.
    pub txt_out: bool,
    /// Correlation stage executable.
    pub corr_exe: String,
    /// Memory kernel stage executable.
    pub kernel_exe: String,
    /// Fluctuating force stage executable.
    pub ff_exe: String,
    /// Simulation stage executable.
    pub sim_exe: String,
    /// Half width of the mollifier in time steps; zero disables mollification.
    pub mollifier_width: usize,
    /// Draw initial values from a Gaussian.
    pub gaussian_init_val: bool,
    /// Forward differences and lower Darboux sums instead of Simpson's rule.
    pub darboux_sum: bool,
    /// Treat the process as stationary.
    pub stationary: bool,
    /// Number of pieces stationary trajectories are chopped into.
    pub chop_stationary_trajectories: usize,
}

/// Keys of every [`StageConfig`] field, in serialization order.
pub const FIELD_KEYS: [&str; 21] = [
    "out_folder",
    "in_folder",
    "in_prefix",
    "file_range",
    "num_obs",
    "t_min",
    "t_max",
    "increment",
    "shift",
    "fluctuating_force",
    "num_sim",
    "txt_out",
    "corr_exe",
    "kernel_exe",
    "ff_exe",
    "sim_exe",
    "mollifier_width",
    "gaussian_init_val",
    "darboux_sum",
    "stationary",
    "chop_stationary_trajectories",
];

/// Name of the parameter file written into `out_folder`.
pub const PARAMETER_FILE_NAME: &str = "parameter.txt";

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            out_folder: "./OUT".into(),
            in_folder: "./TEST_DATA".into(),
            in_prefix: String::new(),
            file_range: "0-999".into(),
            num_obs: 1,
            t_min: 0.0,
            t_max: 1000.0,
            increment: 1,
            shift: true,
            fluctuating_force: false,
            num_sim: 0,
            txt_out: true,
            corr_exe: "./bin/Release/main_correlation".into(),
            kernel_exe: "./bin/Release/main_kernel".into(),
            ff_exe: "./bin/Release/main_fluctuating_forces".into(),
            sim_exe: "./bin/Release/main_simulator".into(),
            mollifier_width: 10,
            gaussian_init_val: false,
            darboux_sum: true,
            stationary: false,
            chop_stationary_trajectories: 0,
        }
    }
}

/// Typed view of one field, used when rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// Path or free text without whitespace.
    Text(&'a str),
    /// Non-negative count.
    Count(usize),
    /// Floating point value.
    Real(f64),
    /// Flag.
    Flag(bool),
}

/// How boolean strings are interpreted by [`StageConfig::set_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolRule {
    /// Legacy rule: anything outside the true literals is `false`.
    Lenient,
    /// Unknown literals are an error.
    Strict,
}

impl StageConfig {
    /// Every field as `(key, value)` in serialization order.
    pub fn fields(&self) -> [(&'static str, FieldValue<'_>); 21] {
        use FieldValue::{Count, Flag, Real, Text};
        [
            ("out_folder", Text(&self.out_folder)),
            ("in_folder", Text(&self.in_folder)),
            ("in_prefix", Text(&self.in_prefix)),
            ("file_range", Text(&self.file_range)),
            ("num_obs", Count(self.num_obs)),
            ("t_min", Real(self.t_min)),
            ("t_max", Real(self.t_max)),
            ("increment", Count(self.increment)),
            ("shift", Flag(self.shift)),
            ("fluctuating_force", Flag(self.fluctuating_force)),
            ("num_sim", Count(self.num_sim)),
            ("txt_out", Flag(self.txt_out)),
            ("corr_exe", Text(&self.corr_exe)),
            ("kernel_exe", Text(&self.kernel_exe)),
            ("ff_exe", Text(&self.ff_exe)),
            ("sim_exe", Text(&self.sim_exe)),
            ("mollifier_width", Count(self.mollifier_width)),
            ("gaussian_init_val", Flag(self.gaussian_init_val)),
            ("darboux_sum", Flag(self.darboux_sum)),
            ("stationary", Flag(self.stationary)),
            (
                "chop_stationary_trajectories",
                Count(self.chop_stationary_trajectories),
            ),
        ]
    }

    /// Sets one field from its raw string form.
    pub fn set_field(&mut self, key: &str, raw: &str, rule: BoolRule) -> Result<(), LsimError> {
        match key {
            "out_folder" => self.out_folder = raw.to_string(),
            "in_folder" => self.in_folder = raw.to_string(),
            "in_prefix" => self.in_prefix = raw.to_string(),
            "file_range" => self.file_range = raw.to_string(),
            "num_obs" => self.num_obs = parse(key, raw)?,
            "t_min" => self.t_min = parse(key, raw)?,
            "t_max" => self.t_max = parse(key, raw)?,
            "increment" => self.increment = parse(key, raw)?,
            "shift" => self.shift = parse_flag(key, raw, rule)?,
            "fluctuating_force" => self.fluctuating_force = parse_flag(key, raw, rule)?,
            "num_sim" => self.num_sim = parse(key, raw)?,
            "txt_out" => self.txt_out = parse_flag(key, raw, rule)?,
            "corr_exe" => self.corr_exe = raw.to_string(),
            "kernel_exe" => self.kernel_exe = raw.to_string(),
            "ff_exe" => self.ff_exe = raw.to_string(),
            "sim_exe" => self.sim_exe = raw.to_string(),
            "mollifier_width" => self.mollifier_width = parse(key, raw)?,
            "gaussian_init_val" => self.gaussian_init_val = parse_flag(key, raw, rule)?,
            "darboux_sum" => self.darboux_sum = parse_flag(key, raw, rule)?,
            "stationary" => self.stationary = parse_flag(key, raw, rule)?,
            "chop_stationary_trajectories" => {
                self.chop_stationary_trajectories = parse(key, raw)?
            }
            _ => {
                return Err(LsimError::UnknownParameter(
                    ErrorInfo::new("stage.unknown_key", format!("`{key}` is not a stage parameter"))
                        .with_context("key", key)
                        .with_hint(format!("known keys: {}", FIELD_KEYS.join(", "))),
                ))
            }
        }
        Ok(())
    }

    /// Applies a `key=value` override with strict boolean parsing.
    pub fn apply_override(&mut self, assignment: &str) -> Result<(), LsimError> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            LsimError::InvalidType(
                ErrorInfo::new("stage.override_syntax", "expected key=value")
                    .with_context("override", assignment),
            )
        })?;
        self.set_field(key.trim(), value.trim(), BoolRule::Strict)
    }

    /// Reads the configuration the way a stage does: every field present in
    /// the store replaces the default, using the legacy boolean rule.
    pub fn from_store(store: &ParameterStore) -> Result<Self, LsimError> {
        let mut config = Self::default();
        for key in FIELD_KEYS {
            if let Some(raw) = store.raw(key) {
                config.set_field(key, raw, BoolRule::Lenient)?;
            }
        }
        Ok(config)
    }

    /// Loads a possibly partial YAML run file; missing keys take defaults.
    pub fn load_yaml(path: &Path) -> Result<Self, LsimError> {
        let contents = fs::read_to_string(path)
            .map_err(|err| LsimError::from_read("stage.yaml_read", path, &err))?;
        serde_yaml::from_str(&contents).map_err(|err| {
            LsimError::Serde(
                ErrorInfo::new("stage.yaml_parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Registers a help line for every field.
    pub fn register_usage(store: &mut ParameterStore) {
        for (key, description) in USAGE {
            store.register_usage(key, description);
        }
    }

    /// `<out_folder>/parameter.txt`.
    pub fn parameter_file_path(&self) -> PathBuf {
        Path::new(&self.out_folder).join(PARAMETER_FILE_NAME)
    }

    /// Rejects string fields the line format cannot carry.
    ///
    /// An empty value serializes to a one-token line that readers skip, so
    /// only `in_prefix`, whose default is empty, may be empty.
    pub fn validate(&self) -> Result<(), LsimError> {
        for (key, value) in self.fields() {
            if let FieldValue::Text(text) = value {
                if text.is_empty() && key != "in_prefix" {
                    return Err(LsimError::InvalidType(
                        ErrorInfo::new("stage.empty", "parameter value cannot be empty")
                            .with_context("key", key)
                            .with_hint(format!("drop the override to keep the default for `{key}`")),
                    ));
                }
                if text.chars().any(char::is_whitespace) {
                    return Err(LsimError::InvalidType(
                        ErrorInfo::new(
                            "stage.whitespace",
                            "parameter values cannot contain whitespace",
                        )
                        .with_context("key", key)
                        .with_context("value", text),
                    ));
                }
            }
        }
        Ok(())
    }
}

const USAGE: [(&str, &str); 21] = [
    ("out_folder", "Output directory. Default: ./OUT"),
    ("in_folder", "Path to the directory containing the data files."),
    ("in_prefix", "Prefix of the data files."),
    (
        "file_range",
        "Ranges of file numbers, e.g. 1-100 or 101-200,301-400.",
    ),
    ("num_obs", "Number of observables."),
    ("t_min", "Time to begin evaluation."),
    ("t_max", "Time to end evaluation."),
    ("increment", "Use every <increment>-th time step."),
    (
        "shift",
        "Boolean. If true, the average initial value is subtracted. Default: true",
    ),
    (
        "fluctuating_force",
        "Boolean. If true, the fluctuating forces are computed. Default: false",
    ),
    ("num_sim", "Number of simulated trajectories. Default: 0"),
    (
        "txt_out",
        "Boolean. If true, writes output files in text format. Default: true",
    ),
    ("corr_exe", "Correlation stage executable."),
    ("kernel_exe", "Memory kernel stage executable."),
    ("ff_exe", "Fluctuating force stage executable."),
    ("sim_exe", "Simulation stage executable."),
    (
        "mollifier_width",
        "Total mollifier width is 2*<mollifier_width> time steps; zero disables it.",
    ),
    (
        "gaussian_init_val",
        "Boolean. If true, initial values are drawn from a Gaussian. Default: false",
    ),
    (
        "darboux_sum",
        "Boolean. Forward differences and lower Darboux sums instead of Simpson's rule. Default: true",
    ),
    (
        "stationary",
        "Boolean. If true, treats the process as stationary. Default: false",
    ),
    (
        "chop_stationary_trajectories",
        "Number of pieces each stationary trajectory is chopped into. Default: 0",
    ),
];

fn parse<T: ParameterValue>(key: &str, raw: &str) -> Result<T, LsimError> {
    T::parse_parameter(raw).map_err(|reason| invalid(key, raw, T::TYPE_NAME, reason))
}

fn parse_flag(key: &str, raw: &str, rule: BoolRule) -> Result<bool, LsimError> {
    match rule {
        BoolRule::Lenient => parse::<bool>(key, raw),
        BoolRule::Strict => {
            parse_bool_strict(raw).map_err(|reason| invalid(key, raw, "bool", reason))
        }
    }
}

fn invalid(key: &str, raw: &str, expected: &str, reason: String) -> LsimError {
    LsimError::InvalidType(
        ErrorInfo::new("stage.invalid_value", format!("`{key}` has wrong type"))
            .with_context("key", key)
            .with_context("value", raw)
            .with_context("expected", expected)
            .with_context("reason", reason),
    )
}
