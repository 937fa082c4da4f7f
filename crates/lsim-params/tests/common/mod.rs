#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub fn parameter_file(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("parameter.txt");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

pub fn argv(path: &Path, extra: &[&str]) -> Vec<String> {
    let mut args = vec!["main_kernel".to_string(), path.display().to_string()];
    args.extend(extra.iter().map(|s| s.to_string()));
    args
}
