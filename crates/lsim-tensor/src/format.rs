//! File extension based dispatch between the binary and text formats.

use std::path::Path;

use lsim_core::errors::LsimError;

use crate::binary::{self, CodecOptions, ElementType, HeaderLayout};
use crate::tensor::Tensor;
use crate::text;

/// On-disk representation selected for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorFormat {
    /// Binary exchange format with the given value type.
    Binary(ElementType),
    /// Text format.
    Text,
}

impl TensorFormat {
    /// `.f64` and `.f32` select the binary format; anything else is text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("f64") => TensorFormat::Binary(ElementType::F64),
            Some("f32") => TensorFormat::Binary(ElementType::F32),
            _ => TensorFormat::Text,
        }
    }
}

/// Saves a tensor choosing the format from the extension of `path`.
pub fn save(tensor: &Tensor, path: &Path) -> Result<(), LsimError> {
    save_with_layout(tensor, path, HeaderLayout::default())
}

/// Saves a tensor with an explicit header layout for binary targets.
pub fn save_with_layout(tensor: &Tensor, path: &Path, layout: HeaderLayout) -> Result<(), LsimError> {
    match TensorFormat::from_path(path) {
        TensorFormat::Binary(element) => {
            binary::write_tensor_with(tensor, path, &CodecOptions { layout, element })
        }
        TensorFormat::Text => text::write_text(tensor, path),
    }
}

/// Loads a tensor choosing the format from the extension of `path`.
pub fn load(path: &Path) -> Result<Tensor, LsimError> {
    load_with_layout(path, HeaderLayout::default())
}

/// Loads a tensor with an explicit header layout for binary sources.
pub fn load_with_layout(path: &Path, layout: HeaderLayout) -> Result<Tensor, LsimError> {
    match TensorFormat::from_path(path) {
        TensorFormat::Binary(element) => {
            binary::read_tensor_with(path, &CodecOptions { layout, element })
        }
        TensorFormat::Text => text::read_text(path),
    }
}
