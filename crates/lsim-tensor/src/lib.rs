//! Rank-N double tensors and the file formats lsim stages use to exchange
//! trajectories, correlation matrices and memory kernels.

pub mod binary;
pub mod format;
pub mod hash;
pub mod tensor;
pub mod text;

pub use binary::{
    decode, encode, read_tensor, read_tensor_with, write_tensor, write_tensor_with, CodecOptions,
    ElementType, HeaderLayout,
};
pub use format::{load, load_with_layout, save, save_with_layout, TensorFormat};
pub use hash::digest;
pub use tensor::{element_count, Tensor, TensorSummary};
pub use text::{from_text, read_text, to_text, write_text};
