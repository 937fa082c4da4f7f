use lsim_core::errors::LsimError;
use sha2::{Digest, Sha256};

use crate::binary::{encode, CodecOptions};
use crate::tensor::Tensor;

/// SHA-256 of the canonical (`Fixed64`, `f64`) encoding, hex encoded.
pub fn digest(tensor: &Tensor) -> Result<String, LsimError> {
    let bytes = encode(tensor, &CodecOptions::default())?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
