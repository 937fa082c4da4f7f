//! Stage configuration and the pipeline that drives the external stages.
//!
//! A [`StageConfig`] is serialized into `<out_folder>/parameter.txt`, which
//! every stage reads through `lsim_params`. The pipeline then starts the
//! correlation, kernel, optional fluctuating force and optional simulation
//! stages in that order.

pub mod config;
pub mod inputs;
pub mod pipeline;
pub mod serialize;

pub use config::{BoolRule, FieldValue, StageConfig, FIELD_KEYS, PARAMETER_FILE_NAME};
pub use inputs::{discover_inputs, FileRange};
pub use pipeline::{
    normalize_path, plan, run_pipeline, FailurePolicy, PipelineReport, ProcessRunner, Stage,
    StageInvocation, StageOutcome, StageRunner,
};
pub use serialize::{serialize, write};
