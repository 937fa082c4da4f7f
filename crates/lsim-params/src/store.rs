use lsim_core::errors::{ErrorInfo, LsimError};
use serde::{Deserialize, Serialize};

use crate::usage::Usage;
use crate::value::{parse_bool_strict, split_list, ParameterValue};

/// One resolved `(name, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterEntry {
    /// Parameter name.
    pub name: String,
    /// Unconverted value as it appeared on the command line or in the file.
    pub value: String,
}

impl ParameterEntry {
    /// Creates an entry.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered parameter registry plus the usage text shown on `--help`.
///
/// Lookups scan from the front and the first entry with a matching name
/// wins. Resolution appends command-line overrides before file entries, so
/// overrides shadow the file.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    entries: Vec<ParameterEntry>,
    usage: Usage,
}

impl ParameterStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a help line for `name`. Duplicates are allowed.
    pub fn register_usage(&mut self, name: impl Into<String>, description: impl Into<String>) {
        self.usage.register(name, description);
    }

    /// Adds a free-form line printed after the parameter list.
    pub fn add_usage_description(&mut self, line: impl Into<String>) {
        self.usage.describe(line);
    }

    /// Registered usage information.
    pub fn usage(&self) -> &Usage {
        &self.usage
    }

    /// Renders the help text.
    pub fn usage_text(&self, program: &str, additional: &str) -> String {
        self.usage.render(program, additional)
    }

    /// Appends an entry after all existing ones.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push(ParameterEntry::new(name, value));
    }

    pub(crate) fn clear_entries(&mut self) {
        self.entries.clear();
    }

    /// All entries in lookup order.
    pub fn entries(&self) -> &[ParameterEntry] {
        &self.entries
    }

    /// Number of entries, shadowed ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no entry has been resolved.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` when some entry carries `name`.
    pub fn is_set(&self, name: &str) -> bool {
        self.raw(name).is_some()
    }

    /// Raw value of the first entry named `name`.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value.as_str())
    }

    /// Typed lookup of a required parameter.
    pub fn get<T: ParameterValue>(&self, name: &str) -> Result<T, LsimError> {
        let raw = self.require(name)?;
        convert::<T>(name, raw)
    }

    /// Typed lookup falling back to `default` when the name is absent.
    ///
    /// A present but unparseable value is still an error.
    pub fn get_or<T: ParameterValue>(&self, name: &str, default: T) -> Result<T, LsimError> {
        match self.raw(name) {
            Some(raw) => convert::<T>(name, raw),
            None => Ok(default),
        }
    }

    /// Boolean lookup that rejects anything outside the true/false literal sets.
    pub fn get_bool_strict(&self, name: &str) -> Result<bool, LsimError> {
        let raw = self.require(name)?;
        parse_bool_strict(raw).map_err(|reason| invalid_type(name, raw, "bool", reason))
    }

    /// Strict boolean lookup with a default for absent names.
    pub fn get_bool_strict_or(&self, name: &str, default: bool) -> Result<bool, LsimError> {
        match self.raw(name) {
            Some(raw) => {
                parse_bool_strict(raw).map_err(|reason| invalid_type(name, raw, "bool", reason))
            }
            None => Ok(default),
        }
    }

    /// Comma separated list lookup, e.g. `weights 0.5,1.5,2`.
    pub fn get_vec<T: ParameterValue>(&self, name: &str) -> Result<Vec<T>, LsimError> {
        let raw = self.require(name)?;
        convert_list::<T>(name, raw)
    }

    /// List lookup with a default for absent names.
    pub fn get_vec_or<T: ParameterValue>(
        &self,
        name: &str,
        default: Vec<T>,
    ) -> Result<Vec<T>, LsimError> {
        match self.raw(name) {
            Some(raw) => convert_list::<T>(name, raw),
            None => Ok(default),
        }
    }

    fn require(&self, name: &str) -> Result<&str, LsimError> {
        self.raw(name).ok_or_else(|| {
            LsimError::MissingRequiredParameter(
                ErrorInfo::new("params.missing", format!("parameter `{name}` not defined"))
                    .with_context("name", name)
                    .with_hint(format!(
                        "add `{name} <value>` to the parameter file or pass -P{name}=<value>"
                    )),
            )
        })
    }
}

fn convert<T: ParameterValue>(name: &str, raw: &str) -> Result<T, LsimError> {
    T::parse_parameter(raw).map_err(|reason| invalid_type(name, raw, T::TYPE_NAME, reason))
}

fn convert_list<T: ParameterValue>(name: &str, raw: &str) -> Result<Vec<T>, LsimError> {
    let items = split_list(raw)
        .map(|item| convert::<T>(name, item))
        .collect::<Result<Vec<_>, _>>()?;
    if items.is_empty() {
        return Err(invalid_type(
            name,
            raw,
            T::TYPE_NAME,
            "list contains no elements".to_string(),
        ));
    }
    Ok(items)
}

fn invalid_type(name: &str, raw: &str, expected: &str, reason: String) -> LsimError {
    LsimError::InvalidType(
        ErrorInfo::new(
            "params.invalid_type",
            format!("parameter `{name}` has wrong type"),
        )
        .with_context("name", name)
        .with_context("value", raw)
        .with_context("expected", expected)
        .with_context("reason", reason),
    )
}
