//! Resolution of command-line overrides and parameter files into a store.

use std::fs;
use std::path::{Path, PathBuf};

use lsim_core::errors::LsimError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::{ParameterEntry, ParameterStore};

/// Tokens that request the help text when they are the first argument.
pub const HELP_FLAGS: [&str; 2] = ["-h", "--help"];

/// Tokens that may precede the parameter file path.
pub const FILE_FLAGS: [&str; 2] = ["-f", "--file"];

/// Inputs to [`resolve`].
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// Explicit parameter file; when `None` the path is taken from `args`.
    pub file: Option<PathBuf>,
    /// Ignore `-P<name>=<value>` tokens.
    pub disable_overrides: bool,
    /// Extra text appended to the generated help.
    pub additional_usage: String,
    /// Full argument vector, program name first.
    pub args: Vec<String>,
}

impl ResolveRequest {
    /// Request built from the process arguments.
    pub fn from_env() -> Self {
        Self::with_args(std::env::args().collect())
    }

    /// Request built from an explicit argument vector (program name first).
    pub fn with_args(args: Vec<String>) -> Self {
        Self {
            args,
            ..Self::default()
        }
    }

    /// Uses `path` instead of looking for a positional file argument.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Disables command-line overrides.
    pub fn disable_overrides(mut self, disable: bool) -> Self {
        self.disable_overrides = disable;
        self
    }

    /// Sets text appended to the generated help.
    pub fn additional_usage(mut self, text: impl Into<String>) -> Self {
        self.additional_usage = text.into();
        self
    }

    fn program(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("lsim-stage")
    }

    fn tokens(&self) -> &[String] {
        self.args.get(1..).unwrap_or(&[])
    }
}

/// Counts describing a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveSummary {
    /// Parameter file that was read.
    pub path: PathBuf,
    /// Number of command-line entries.
    pub overrides: usize,
    /// Number of entries read from the file.
    pub file_entries: usize,
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Help was requested or no parameter file was given; carries the text.
    Help(String),
    /// The store has been populated.
    Resolved(ResolveSummary),
}

/// Populates `store` from the command line and a parameter file.
///
/// Previously resolved entries are discarded. Command-line overrides are
/// appended first so they shadow file entries of the same name.
pub fn resolve(store: &mut ParameterStore, request: &ResolveRequest) -> Result<Resolution, LsimError> {
    let tokens = request.tokens();
    if tokens
        .first()
        .is_some_and(|first| HELP_FLAGS.contains(&first.as_str()))
    {
        return Ok(Resolution::Help(help(store, request)));
    }

    let (path, rest) = match &request.file {
        Some(path) => (path.clone(), tokens),
        None => match positional_file(tokens) {
            Some(found) => found,
            None => return Ok(Resolution::Help(help(store, request))),
        },
    };

    store.clear_entries();
    let mut overrides = 0;
    if !request.disable_overrides {
        for token in rest {
            match parse_override(token) {
                Some(entry) => {
                    debug!(name = %entry.name, value = %entry.value, "command-line override");
                    store.push(entry.name, entry.value);
                    overrides += 1;
                }
                None if token.starts_with("-P") => {
                    warn!(token = %token, "ignoring malformed override, expected -P<name>=<value>");
                }
                None => {}
            }
        }
    }

    let file_count = append_file(store, &path)?;
    debug!(
        path = %path.display(),
        overrides,
        file_entries = file_count,
        "resolved parameters"
    );
    Ok(Resolution::Resolved(ResolveSummary {
        path,
        overrides,
        file_entries: file_count,
    }))
}

/// Reads a parameter file without consulting the command line.
pub fn resolve_file(store: &mut ParameterStore, path: &Path) -> Result<ResolveSummary, LsimError> {
    store.clear_entries();
    let file_entries = append_file(store, path)?;
    debug!(path = %path.display(), file_entries, "resolved parameter file");
    Ok(ResolveSummary {
        path: path.to_path_buf(),
        overrides: 0,
        file_entries,
    })
}

fn append_file(store: &mut ParameterStore, path: &Path) -> Result<usize, LsimError> {
    let contents =
        fs::read_to_string(path).map_err(|err| LsimError::from_read("params.open", path, &err))?;
    let entries = parse_parameter_text(&contents);
    let count = entries.len();
    for entry in entries {
        store.push(entry.name, entry.value);
    }
    Ok(count)
}

/// Parses the parameter file grammar.
///
/// Lines starting with `#` (after leading blanks) are comments. Lines that do
/// not split into exactly two whitespace separated tokens are skipped.
pub fn parse_parameter_text(text: &str) -> Vec<ParameterEntry> {
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            match (tokens.next(), tokens.next(), tokens.next()) {
                (Some(name), Some(value), None) => Some(ParameterEntry::new(name, value)),
                _ => None,
            }
        })
        .collect()
}

/// Parses one `-P<name>=<value>` token.
///
/// The name must be a non-empty run of ASCII alphanumerics or `_`; the value
/// must be non-empty and free of whitespace.
pub fn parse_override(token: &str) -> Option<ParameterEntry> {
    let body = token.strip_prefix("-P")?;
    let (name, value) = body.split_once('=')?;
    let name_ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    let value_ok = !value.is_empty() && !value.chars().any(char::is_whitespace);
    (name_ok && value_ok).then(|| ParameterEntry::new(name, value))
}

fn positional_file(tokens: &[String]) -> Option<(PathBuf, &[String])> {
    let first = tokens.first()?;
    if FILE_FLAGS.contains(&first.as_str()) {
        let path = tokens.get(1)?;
        return Some((PathBuf::from(path), &tokens[2..]));
    }
    if first.starts_with('-') {
        return None;
    }
    Some((PathBuf::from(first), &tokens[1..]))
}

fn help(store: &ParameterStore, request: &ResolveRequest) -> String {
    store.usage_text(request.program(), &request.additional_usage)
}
