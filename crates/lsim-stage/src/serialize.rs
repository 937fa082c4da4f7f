//! Flat `<key> <value>` rendering of a [`StageConfig`], the format every
//! stage reads back through its parameter store.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use lsim_core::errors::LsimError;
use tracing::debug;

use crate::config::{FieldValue, StageConfig};

/// Renders one line per field, in field order, without comments.
///
/// Flags render as `true`/`false`, both of which the stages' boolean rule
/// reads back unchanged. Reals use the shortest representation that parses
/// back to the same `f64`.
pub fn serialize(config: &StageConfig) -> String {
    let mut out = String::new();
    for (key, value) in config.fields() {
        let _ = writeln!(out, "{key} {}", render(value));
    }
    out
}

/// Writes [`serialize`] to `path`, creating the parent directory.
pub fn write(config: &StageConfig, path: &Path) -> Result<(), LsimError> {
    config.validate()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| LsimError::from_write("stage.mkdir", parent, &err))?;
    }
    fs::write(path, serialize(config))
        .map_err(|err| LsimError::from_write("stage.write", path, &err))?;
    debug!(path = %path.display(), "wrote parameter file");
    Ok(())
}

fn render(value: FieldValue<'_>) -> String {
    match value {
        FieldValue::Text(text) => text.to_string(),
        FieldValue::Count(count) => count.to_string(),
        // Debug keeps a trailing `.0` on integral values.
        FieldValue::Real(real) => format!("{real:?}"),
        FieldValue::Flag(flag) => flag.to_string(),
    }
}
