#![deny(missing_docs)]
#![doc = "Shared building blocks for the lsim pipeline: the structured error surface used by the tensor codec, the parameter store and the stage driver."]

pub mod errors;

pub use errors::{ErrorInfo, LsimError};
