use std::fs;

use lsim_core::LsimError;
use lsim_tensor::{decode, read_tensor, to_text, CodecOptions, Tensor};
use tempfile::tempdir;

fn header(words: &[u64]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_le_bytes()).collect()
}

fn doubles(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|value| value.to_le_bytes()).collect()
}

#[test]
fn declared_count_must_match_shape_product() {
    let mut bytes = header(&[2, 2, 3, 5]);
    bytes.extend(doubles(&[1.0, 2.0, 3.0, 4.0, 5.0]));
    let err = decode(&bytes, &CodecOptions::default()).unwrap_err();
    assert!(matches!(err, LsimError::ShapeCountMismatch(_)), "{err}");
    assert_eq!(err.info().context.get("declared").map(String::as_str), Some("5"));
    assert_eq!(err.info().context.get("shape_product").map(String::as_str), Some("6"));
}

#[test]
fn mismatch_is_reported_from_file_with_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.f64");
    let mut bytes = header(&[2, 2, 3, 5]);
    bytes.extend(doubles(&[0.0; 6]));
    fs::write(&path, bytes).unwrap();
    let err = read_tensor(&path).unwrap_err();
    assert!(matches!(err, LsimError::ShapeCountMismatch(_)));
    assert!(err.info().context.contains_key("path"));
}

#[test]
fn short_payload_is_truncated() {
    let mut bytes = header(&[1, 4, 4]);
    bytes.extend(doubles(&[1.0, 2.0, 3.0]));
    let err = decode(&bytes, &CodecOptions::default()).unwrap_err();
    assert!(matches!(err, LsimError::TruncatedFile(_)), "{err}");
}

#[test]
fn partial_header_is_truncated() {
    let mut bytes = header(&[3, 2]);
    bytes.extend_from_slice(&[0u8; 3]);
    let err = decode(&bytes, &CodecOptions::default()).unwrap_err();
    assert!(matches!(err, LsimError::TruncatedFile(_)));
}

#[test]
fn absurd_rank_is_truncated_without_allocating() {
    let bytes = header(&[u64::MAX >> 8]);
    let err = decode(&bytes, &CodecOptions::default()).unwrap_err();
    assert!(matches!(err, LsimError::TruncatedFile(_)));
}

#[test]
fn empty_file_is_truncated() {
    let err = decode(&[], &CodecOptions::default()).unwrap_err();
    assert!(matches!(err, LsimError::TruncatedFile(_)));
}

#[test]
fn trailing_bytes_are_rejected() {
    let mut bytes = header(&[1, 2, 2]);
    bytes.extend(doubles(&[1.0, 2.0, 3.0]));
    let err = decode(&bytes, &CodecOptions::default()).unwrap_err();
    assert!(matches!(err, LsimError::ShapeCountMismatch(_)));
}

#[test]
fn missing_file_is_file_not_found() {
    let dir = tempdir().unwrap();
    let err = read_tensor(&dir.path().join("absent.f64")).unwrap_err();
    assert!(matches!(err, LsimError::FileNotFound(_)));
}

#[test]
fn constructor_enforces_invariant() {
    let err = Tensor::new(vec![2, 2], vec![1.0; 3]).unwrap_err();
    assert!(matches!(err, LsimError::ShapeCountMismatch(_)));
}

#[test]
fn indexing_is_row_major() {
    let tensor = Tensor::new(vec![2, 3], (0..6).map(f64::from).collect()).unwrap();
    assert_eq!(tensor.strides(), vec![3, 1]);
    assert_eq!(tensor.get(&[1, 0]), Some(3.0));
    assert_eq!(tensor.get(&[0, 2]), Some(2.0));
    assert_eq!(tensor.get(&[2, 0]), None);
    let reshaped = tensor.reshape(vec![3, 2]).unwrap();
    assert_eq!(reshaped.get(&[1, 0]), Some(2.0));
}

#[test]
fn zero_extent_cannot_hide_overflowing_dimensions() {
    let bytes = header(&[3, 0, 1 << 33, 1 << 33, 0]);
    let err = decode(&bytes, &CodecOptions::default()).unwrap_err();
    assert!(matches!(err, LsimError::ShapeCountMismatch(_)), "{err}");

    let err = Tensor::new(vec![0, usize::MAX / 2, 4], Vec::new()).unwrap_err();
    assert!(matches!(err, LsimError::ShapeCountMismatch(_)));
}

#[test]
fn empty_tensor_with_zero_extent_decodes_and_renders() {
    let bytes = header(&[2, 0, 3, 0]);
    let tensor = decode(&bytes, &CodecOptions::default()).unwrap();
    assert!(tensor.is_empty());
    assert_eq!(tensor.strides(), vec![3, 1]);
    assert_eq!(tensor.get(&[0, 0]), None);
    assert_eq!(to_text(&tensor), "0\t3\t\n\n");
}
