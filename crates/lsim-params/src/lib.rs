//! Layered parameter resolution for lsim stages.
//!
//! A stage builds a [`ParameterStore`], registers help lines, and resolves
//! its parameter file together with `-P<name>=<value>` command-line
//! overrides. Overrides are stored ahead of file entries, and lookups return
//! the first match, so the command line always wins.
//!
//! ```no_run
//! use lsim_params::{resolve, ParameterStore, Resolution, ResolveRequest};
//!
//! let mut store = ParameterStore::new();
//! store.register_usage("num_obs", "Number of observables.");
//! match resolve(&mut store, &ResolveRequest::from_env())? {
//!     Resolution::Help(text) => print!("{text}"),
//!     Resolution::Resolved(_) => {
//!         let num_obs: usize = store.get_or("num_obs", 1)?;
//!         println!("num_obs = {num_obs}");
//!     }
//! }
//! # Ok::<(), lsim_core::LsimError>(())
//! ```

pub mod exit;
pub mod export;
pub mod resolve;
pub mod store;
pub mod usage;
pub mod value;

pub use exit::{get_or_default_or_exit, get_or_exit, resolve_or_exit};
pub use export::{export, render_export};
pub use resolve::{
    parse_override, parse_parameter_text, resolve, resolve_file, Resolution, ResolveRequest,
    ResolveSummary,
};
pub use store::{ParameterEntry, ParameterStore};
pub use usage::{Usage, UsageEntry};
pub use value::{parse_bool_strict, ParameterValue, FALSE_LITERALS, TRUE_LITERALS};
