use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::Utc;
use lsim_core::errors::LsimError;
use tracing::debug;

use crate::store::ParameterStore;

/// Renders the registry as a parameter file.
///
/// Two comment lines record the generation time and the command that produced
/// the store; every entry follows in lookup order, shadowed ones included, so
/// re-resolving the output yields the same first-wins view.
pub fn render_export(store: &ParameterStore, command: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# File generated on UTC {}",
        Utc::now().format("%a %b %e %H:%M:%S %Y")
    );
    let _ = writeln!(out, "# by command: {}", command.join(" "));
    out.push('\n');
    for entry in store.entries() {
        let _ = writeln!(out, "{} {}", entry.name, entry.value);
    }
    out
}

/// Writes [`render_export`] to `path`.
pub fn export(store: &ParameterStore, path: &Path, command: &[String]) -> Result<(), LsimError> {
    fs::write(path, render_export(store, command))
        .map_err(|err| LsimError::from_write("params.export", path, &err))?;
    debug!(path = %path.display(), entries = store.len(), "exported parameters");
    Ok(())
}
