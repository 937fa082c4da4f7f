use lsim_core::errors::{ErrorInfo, LsimError};
use serde::{Deserialize, Serialize};

/// Dense rank-N tensor of `f64` values stored in row-major order.
///
/// The flat value buffer always holds exactly `product(shape)` elements. A
/// rank-0 tensor (empty shape) holds a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    values: Vec<f64>,
}

/// Lightweight description of a tensor used for reports and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorSummary {
    /// Extent of every dimension.
    pub shape: Vec<usize>,
    /// Number of dimensions.
    pub rank: usize,
    /// Number of stored values.
    pub element_count: usize,
}

/// Returns the number of elements implied by `shape`, or `None` on overflow.
///
/// The product of the non-zero extents must fit `usize` even when some
/// extent is zero, so strides and offsets of every admitted shape fit too.
pub fn element_count(shape: &[usize]) -> Option<usize> {
    let span = shape
        .iter()
        .filter(|&&dim| dim != 0)
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))?;
    if shape.contains(&0) {
        Some(0)
    } else {
        Some(span)
    }
}

impl Tensor {
    /// Builds a tensor, validating that `values` matches the shape.
    pub fn new(shape: Vec<usize>, values: Vec<f64>) -> Result<Self, LsimError> {
        let expected = element_count(&shape).ok_or_else(|| {
            LsimError::ShapeCountMismatch(
                ErrorInfo::new("tensor.shape_overflow", "shape product overflows usize")
                    .with_context("shape", format!("{shape:?}")),
            )
        })?;
        if expected != values.len() {
            return Err(LsimError::ShapeCountMismatch(
                ErrorInfo::new(
                    "tensor.value_count",
                    "value buffer length does not match shape",
                )
                .with_context("shape", format!("{shape:?}"))
                .with_context("expected", expected.to_string())
                .with_context("actual", values.len().to_string()),
            ));
        }
        Ok(Self { shape, values })
    }

    /// Builds a zero-filled tensor with the given shape.
    pub fn zeros(shape: Vec<usize>) -> Result<Self, LsimError> {
        let count = element_count(&shape).ok_or_else(|| {
            LsimError::ShapeCountMismatch(
                ErrorInfo::new("tensor.shape_overflow", "shape product overflows usize")
                    .with_context("shape", format!("{shape:?}")),
            )
        })?;
        Ok(Self {
            shape,
            values: vec![0.0; count],
        })
    }

    /// Extent of every dimension.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when some dimension has extent zero.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Flat row-major view of the values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consumes the tensor and returns its flat buffer.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Row-major strides, last dimension varying fastest.
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1usize; self.shape.len()];
        for axis in (0..self.shape.len().saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1].saturating_mul(self.shape[axis + 1]);
        }
        strides
    }

    /// Returns the value at a multi-index, or `None` when out of range.
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0usize;
        for ((&i, &dim), stride) in index.iter().zip(&self.shape).zip(self.strides()) {
            if i >= dim {
                return None;
            }
            offset += i * stride;
        }
        self.values.get(offset).copied()
    }

    /// Reinterprets the buffer under a new shape with the same element count.
    pub fn reshape(self, shape: Vec<usize>) -> Result<Self, LsimError> {
        Self::new(shape, self.values)
    }

    /// Compares shapes and the raw bit patterns of every value.
    ///
    /// Unlike `==`, two NaN payloads with identical bits compare equal.
    pub fn bitwise_eq(&self, other: &Tensor) -> bool {
        self.shape == other.shape
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }

    /// Summary used by reports.
    pub fn summary(&self) -> TensorSummary {
        TensorSummary {
            shape: self.shape.clone(),
            rank: self.rank(),
            element_count: self.len(),
        }
    }
}
