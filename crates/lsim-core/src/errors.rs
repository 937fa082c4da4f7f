//! Structured error types shared across lsim crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`LsimError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, parameter names, sizes).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the lsim pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum LsimError {
    /// A file that had to be opened does not exist.
    #[error("file not found: {0}")]
    FileNotFound(ErrorInfo),
    /// A file exists but could not be read (permissions, directory, encoding).
    #[error("file unreadable: {0}")]
    FileUnreadable(ErrorInfo),
    /// A parameter without default is absent from the registry.
    #[error("missing required parameter: {0}")]
    MissingRequiredParameter(ErrorInfo),
    /// A value is present but cannot be converted to the requested type.
    #[error("invalid type: {0}")]
    InvalidType(ErrorInfo),
    /// A tensor header declares more data than the file contains.
    #[error("truncated file: {0}")]
    TruncatedFile(ErrorInfo),
    /// Declared element count disagrees with the declared shape.
    #[error("shape/count mismatch: {0}")]
    ShapeCountMismatch(ErrorInfo),
    /// A configuration key is not part of the stage configuration record.
    #[error("unknown parameter: {0}")]
    UnknownParameter(ErrorInfo),
    /// An external stage could not be spawned or exited unsuccessfully.
    #[error("stage failed: {0}")]
    StageFailed(ErrorInfo),
    /// Writing or creating files failed.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Structured (YAML/JSON) encoding errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl LsimError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            LsimError::FileNotFound(info)
            | LsimError::FileUnreadable(info)
            | LsimError::MissingRequiredParameter(info)
            | LsimError::InvalidType(info)
            | LsimError::TruncatedFile(info)
            | LsimError::ShapeCountMismatch(info)
            | LsimError::UnknownParameter(info)
            | LsimError::StageFailed(info)
            | LsimError::Io(info)
            | LsimError::Serde(info) => info,
        }
    }

    /// Returns the stable code of the underlying payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Classifies a failure to open or read `path`.
    ///
    /// `NotFound` maps to [`LsimError::FileNotFound`]; every other I/O kind
    /// maps to [`LsimError::FileUnreadable`].
    pub fn from_read(code: &str, path: &Path, err: &io::Error) -> Self {
        let info = ErrorInfo::new(code, err.to_string())
            .with_context("path", path.display().to_string());
        match err.kind() {
            io::ErrorKind::NotFound => LsimError::FileNotFound(info),
            _ => LsimError::FileUnreadable(info),
        }
    }

    /// Wraps a failure to create or write `path`.
    pub fn from_write(code: &str, path: &Path, err: &io::Error) -> Self {
        LsimError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
        )
    }
}
