//! Adapters that print and terminate the process, for stage executables
//! that want the classic "report and exit" behaviour.

use std::io::{self, Write};
use std::process;

use lsim_core::errors::LsimError;

use crate::resolve::{resolve, Resolution, ResolveRequest, ResolveSummary};
use crate::store::ParameterStore;
use crate::value::ParameterValue;

/// Resolves or exits.
///
/// Help prints to stdout and exits with status 0. Any error prints the
/// message and the help text to stderr and exits with status 1.
pub fn resolve_or_exit(store: &mut ParameterStore, request: &ResolveRequest) -> ResolveSummary {
    match resolve(store, request) {
        Ok(Resolution::Resolved(summary)) => summary,
        Ok(Resolution::Help(text)) => {
            print!("{text}");
            let _ = io::stdout().flush();
            process::exit(0);
        }
        Err(err) => {
            let program = request.args.first().map(String::as_str).unwrap_or("lsim-stage");
            fail(&err, &store.usage_text(program, &request.additional_usage))
        }
    }
}

/// Typed lookup that exits with status 1 on error.
pub fn get_or_exit<T: ParameterValue>(store: &ParameterStore, name: &str) -> T {
    store
        .get::<T>(name)
        .unwrap_or_else(|err| fail(&err, &store.usage_text("lsim-stage", "")))
}

/// Typed lookup with default that exits with status 1 on a wrong type.
pub fn get_or_default_or_exit<T: ParameterValue>(
    store: &ParameterStore,
    name: &str,
    default: T,
) -> T {
    store
        .get_or::<T>(name, default)
        .unwrap_or_else(|err| fail(&err, &store.usage_text("lsim-stage", "")))
}

fn fail(err: &LsimError, usage: &str) -> ! {
    eprintln!("error: {err}");
    eprint!("{usage}");
    process::exit(1);
}
