//! Binary tensor exchange format.
//!
//! Layout: `rank`, `shape[0..rank]`, `element_count` as header integers,
//! followed by `element_count` floating point values in row-major order.
//! The header integer width and byte order are selected by [`HeaderLayout`].

use std::fs;
use std::mem::size_of;
use std::path::Path;

use lsim_core::errors::{ErrorInfo, LsimError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tensor::{element_count, Tensor};

/// Encoding of the header integers and value byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderLayout {
    /// Unsigned 64-bit little-endian header, little-endian values.
    #[default]
    Fixed64,
    /// Platform `usize` header in native byte order, native-endian values.
    ///
    /// Matches files produced by the legacy stages on the same platform and
    /// is not portable across word widths or endianness.
    Native,
}

impl HeaderLayout {
    /// Width in bytes of one header integer.
    pub fn word_width(self) -> usize {
        match self {
            HeaderLayout::Fixed64 => 8,
            HeaderLayout::Native => size_of::<usize>(),
        }
    }
}

/// Storage type of the values following the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementType {
    /// 8-byte IEEE-754 doubles (`.f64`).
    #[default]
    F64,
    /// 4-byte IEEE-754 singles (`.f32`); widened to `f64` on read.
    F32,
}

impl ElementType {
    /// Width in bytes of one stored value.
    pub fn width(self) -> usize {
        match self {
            ElementType::F64 => 8,
            ElementType::F32 => 4,
        }
    }
}

/// Options shared by the binary encoder and decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodecOptions {
    /// Header integer encoding.
    pub layout: HeaderLayout,
    /// Value storage type.
    pub element: ElementType,
}

impl CodecOptions {
    /// Options for legacy native-layout double files.
    pub fn native() -> Self {
        Self {
            layout: HeaderLayout::Native,
            element: ElementType::F64,
        }
    }
}

/// Encodes a tensor into the binary exchange format.
pub fn encode(tensor: &Tensor, opts: &CodecOptions) -> Result<Vec<u8>, LsimError> {
    let header_words = tensor.rank() + 2;
    let mut bytes = Vec::with_capacity(
        header_words * opts.layout.word_width() + tensor.len() * opts.element.width(),
    );
    push_word(&mut bytes, tensor.rank(), opts.layout)?;
    for &dim in tensor.shape() {
        push_word(&mut bytes, dim, opts.layout)?;
    }
    push_word(&mut bytes, tensor.len(), opts.layout)?;
    for &value in tensor.values() {
        match (opts.element, opts.layout) {
            (ElementType::F64, HeaderLayout::Fixed64) => {
                bytes.extend_from_slice(&value.to_le_bytes())
            }
            (ElementType::F64, HeaderLayout::Native) => {
                bytes.extend_from_slice(&value.to_ne_bytes())
            }
            (ElementType::F32, HeaderLayout::Fixed64) => {
                bytes.extend_from_slice(&(value as f32).to_le_bytes())
            }
            (ElementType::F32, HeaderLayout::Native) => {
                bytes.extend_from_slice(&(value as f32).to_ne_bytes())
            }
        }
    }
    Ok(bytes)
}

/// Decodes a tensor from the binary exchange format.
///
/// The declared element count is cross-checked against the product of the
/// declared shape before any value is read, and trailing bytes after the
/// declared payload are rejected.
pub fn decode(bytes: &[u8], opts: &CodecOptions) -> Result<Tensor, LsimError> {
    let mut reader = Reader {
        bytes,
        pos: 0,
        layout: opts.layout,
    };
    let rank = reader.word("rank")?;
    let word = opts.layout.word_width();
    if rank > reader.remaining() / word {
        return Err(truncated("shape", reader.remaining(), rank.saturating_mul(word)));
    }
    let mut shape = Vec::with_capacity(rank);
    for _ in 0..rank {
        shape.push(reader.word("shape")?);
    }
    let declared = reader.word("element_count")?;
    let expected = element_count(&shape).ok_or_else(|| {
        LsimError::ShapeCountMismatch(
            ErrorInfo::new("tensor.shape_overflow", "declared shape product overflows usize")
                .with_context("shape", format!("{shape:?}")),
        )
    })?;
    if declared != expected {
        return Err(LsimError::ShapeCountMismatch(
            ErrorInfo::new(
                "tensor.count_mismatch",
                "declared element count disagrees with declared shape",
            )
            .with_context("shape", format!("{shape:?}"))
            .with_context("shape_product", expected.to_string())
            .with_context("declared", declared.to_string()),
        ));
    }
    let needed = declared
        .checked_mul(opts.element.width())
        .ok_or_else(|| truncated("values", reader.remaining(), usize::MAX))?;
    if needed > reader.remaining() {
        return Err(truncated("values", reader.remaining(), needed));
    }
    let mut values = Vec::with_capacity(declared);
    for _ in 0..declared {
        values.push(reader.value(opts.element));
    }
    if reader.remaining() > 0 {
        return Err(LsimError::ShapeCountMismatch(
            ErrorInfo::new(
                "tensor.trailing_bytes",
                "file holds more data than declared by its header",
            )
            .with_context("trailing", reader.remaining().to_string()),
        ));
    }
    Tensor::new(shape, values)
}

/// Writes `tensor` to `path` as a `Fixed64` double file.
pub fn write_tensor(tensor: &Tensor, path: &Path) -> Result<(), LsimError> {
    write_tensor_with(tensor, path, &CodecOptions::default())
}

/// Writes `tensor` to `path` using explicit codec options.
///
/// The file is replaced as a whole; an interrupted write leaves a file the
/// decoder rejects.
pub fn write_tensor_with(tensor: &Tensor, path: &Path, opts: &CodecOptions) -> Result<(), LsimError> {
    let bytes = encode(tensor, opts)?;
    fs::write(path, &bytes).map_err(|err| LsimError::from_write("tensor.write", path, &err))?;
    debug!(
        path = %path.display(),
        shape = ?tensor.shape(),
        bytes = bytes.len(),
        "wrote binary tensor"
    );
    Ok(())
}

/// Reads a `Fixed64` double file from `path`.
pub fn read_tensor(path: &Path) -> Result<Tensor, LsimError> {
    read_tensor_with(path, &CodecOptions::default())
}

/// Reads a binary tensor file using explicit codec options.
pub fn read_tensor_with(path: &Path, opts: &CodecOptions) -> Result<Tensor, LsimError> {
    let bytes = fs::read(path).map_err(|err| LsimError::from_read("tensor.read", path, &err))?;
    let tensor = decode(&bytes, opts).map_err(|err| with_path(err, path))?;
    debug!(path = %path.display(), shape = ?tensor.shape(), "read binary tensor");
    Ok(tensor)
}

fn push_word(bytes: &mut Vec<u8>, value: usize, layout: HeaderLayout) -> Result<(), LsimError> {
    match layout {
        HeaderLayout::Fixed64 => {
            let wide = u64::try_from(value).map_err(|_| {
                LsimError::ShapeCountMismatch(
                    ErrorInfo::new("tensor.header_overflow", "header value exceeds 64 bits")
                        .with_context("value", value.to_string()),
                )
            })?;
            bytes.extend_from_slice(&wide.to_le_bytes());
        }
        HeaderLayout::Native => bytes.extend_from_slice(&value.to_ne_bytes()),
    }
    Ok(())
}

fn truncated(field: &str, available: usize, needed: usize) -> LsimError {
    LsimError::TruncatedFile(
        ErrorInfo::new("tensor.truncated", "file ends before the declared data")
            .with_context("field", field)
            .with_context("available_bytes", available.to_string())
            .with_context("needed_bytes", needed.to_string()),
    )
}

fn with_path(err: LsimError, path: &Path) -> LsimError {
    let attach = |info: ErrorInfo| info.with_context("path", path.display().to_string());
    match err {
        LsimError::TruncatedFile(info) => LsimError::TruncatedFile(attach(info)),
        LsimError::ShapeCountMismatch(info) => LsimError::ShapeCountMismatch(attach(info)),
        other => other,
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    layout: HeaderLayout,
}

impl Reader<'_> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Option<&[u8]> {
        if self.remaining() < len {
            return None;
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Some(slice)
    }

    fn word(&mut self, field: &str) -> Result<usize, LsimError> {
        let layout = self.layout;
        let available = self.remaining();
        let width = layout.word_width();
        let raw = self
            .take(width)
            .ok_or_else(|| truncated(field, available, width))?;
        match layout {
            HeaderLayout::Fixed64 => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(raw);
                let wide = u64::from_le_bytes(buf);
                usize::try_from(wide).map_err(|_| {
                    LsimError::ShapeCountMismatch(
                        ErrorInfo::new(
                            "tensor.header_overflow",
                            "header value does not fit the platform word",
                        )
                        .with_context("field", field)
                        .with_context("value", wide.to_string()),
                    )
                })
            }
            HeaderLayout::Native => {
                let mut buf = [0u8; size_of::<usize>()];
                buf.copy_from_slice(raw);
                Ok(usize::from_ne_bytes(buf))
            }
        }
    }

    // Callers check the remaining length for the whole payload up front.
    fn value(&mut self, element: ElementType) -> f64 {
        let start = self.pos;
        self.pos += element.width();
        let raw = &self.bytes[start..self.pos];
        match (element, self.layout) {
            (ElementType::F64, layout) => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(raw);
                match layout {
                    HeaderLayout::Fixed64 => f64::from_le_bytes(buf),
                    HeaderLayout::Native => f64::from_ne_bytes(buf),
                }
            }
            (ElementType::F32, layout) => {
                let mut buf = [0u8; 4];
                buf.copy_from_slice(raw);
                let narrow = match layout {
                    HeaderLayout::Fixed64 => f32::from_le_bytes(buf),
                    HeaderLayout::Native => f32::from_ne_bytes(buf),
                };
                f64::from(narrow)
            }
        }
    }
}
