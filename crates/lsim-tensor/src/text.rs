//! Human readable tensor format.
//!
//! The first line lists the shape, followed by a blank line and the values in
//! row-major order. A line break follows every completed innermost row, and
//! one more for every completed higher-rank block.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use lsim_core::errors::{ErrorInfo, LsimError};
use tracing::debug;

use crate::tensor::{element_count, Tensor};

/// Renders a tensor in the text format.
pub fn to_text(tensor: &Tensor) -> String {
    let mut out = String::new();
    for dim in tensor.shape() {
        let _ = write!(out, "{dim}\t");
    }
    out.push_str("\n\n");
    let strides = tensor.strides();
    let breaks = &strides[..strides.len().saturating_sub(1)];
    for (n, value) in tensor.values().iter().enumerate() {
        // 17 significant digits round-trip every f64.
        let _ = write!(out, "{value:.16e}\t");
        for &stride in breaks {
            if (n + 1) % stride == 0 {
                out.push('\n');
            }
        }
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Parses the text format.
pub fn from_text(text: &str) -> Result<Tensor, LsimError> {
    let mut lines = text.lines();
    let header = lines.next().ok_or_else(|| {
        LsimError::TruncatedFile(ErrorInfo::new(
            "tensor.text_empty",
            "text tensor is missing its shape line",
        ))
    })?;
    let shape = header
        .split_whitespace()
        .map(|token| {
            token.parse::<usize>().map_err(|err| {
                LsimError::InvalidType(
                    ErrorInfo::new("tensor.text_shape", err.to_string())
                        .with_context("token", token),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let expected = element_count(&shape).ok_or_else(|| {
        LsimError::ShapeCountMismatch(
            ErrorInfo::new("tensor.shape_overflow", "declared shape product overflows usize")
                .with_context("shape", format!("{shape:?}")),
        )
    })?;
    let mut values = Vec::with_capacity(expected);
    for token in lines.flat_map(str::split_whitespace) {
        if values.len() == expected {
            return Err(LsimError::ShapeCountMismatch(
                ErrorInfo::new("tensor.text_excess", "more values than expected from shape")
                    .with_context("shape", format!("{shape:?}")),
            ));
        }
        let value = token.parse::<f64>().map_err(|err| {
            LsimError::InvalidType(
                ErrorInfo::new("tensor.text_value", err.to_string()).with_context("token", token),
            )
        })?;
        values.push(value);
    }
    if values.len() < expected {
        return Err(LsimError::ShapeCountMismatch(
            ErrorInfo::new("tensor.text_short", "fewer values than expected from shape")
                .with_context("shape", format!("{shape:?}"))
                .with_context("expected", expected.to_string())
                .with_context("actual", values.len().to_string()),
        ));
    }
    Tensor::new(shape, values)
}

/// Writes a tensor to `path` in the text format.
pub fn write_text(tensor: &Tensor, path: &Path) -> Result<(), LsimError> {
    fs::write(path, to_text(tensor))
        .map_err(|err| LsimError::from_write("tensor.text_write", path, &err))?;
    debug!(path = %path.display(), shape = ?tensor.shape(), "wrote text tensor");
    Ok(())
}

/// Reads a tensor from a text file.
pub fn read_text(path: &Path) -> Result<Tensor, LsimError> {
    let text = fs::read_to_string(path)
        .map_err(|err| LsimError::from_read("tensor.text_read", path, &err))?;
    from_text(&text)
}
