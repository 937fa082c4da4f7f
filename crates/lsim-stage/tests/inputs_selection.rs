use std::fs;

use lsim_core::LsimError;
use lsim_stage::{discover_inputs, FileRange};

#[test]
fn range_list_parses_and_skips_malformed_segments() {
    let range = FileRange::parse("0-99,abc,200-299,5");
    assert_eq!(range, FileRange::Ranges(vec![(0, 99), (200, 299)]));
    assert!(range.contains(0));
    assert!(range.contains(250));
    assert!(!range.contains(150));
}

#[test]
fn empty_range_selects_everything() {
    assert_eq!(FileRange::parse(""), FileRange::All);
    assert!(FileRange::parse("  ").contains(123_456));
}

#[test]
fn only_malformed_segments_select_nothing() {
    let range = FileRange::parse("x-y");
    assert!(!range.contains(0));
}

#[test]
fn discovery_filters_prefix_number_and_range() {
    let dir = tempfile::tempdir().unwrap();
    for name in [
        "traj_0.txt",
        "traj_5.txt",
        "traj_12.txt",
        "traj_x.txt",
        "traj_3.dat",
        "other_1.txt",
    ] {
        fs::write(dir.path().join(name), "0.0\n").unwrap();
    }
    fs::create_dir(dir.path().join("traj_7.txt")).unwrap();

    let found = discover_inputs(dir.path(), "traj_", &FileRange::parse("0-9")).unwrap();
    let names: Vec<String> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["traj_0.txt", "traj_5.txt"]);
}

#[test]
fn empty_prefix_matches_bare_numbers() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("3.txt"), "").unwrap();
    fs::write(dir.path().join("a3.txt"), "").unwrap();
    let found = discover_inputs(dir.path(), "", &FileRange::All).unwrap();
    assert_eq!(found, [dir.path().join("3.txt")]);
}

#[test]
fn missing_folder_is_file_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = discover_inputs(&dir.path().join("absent"), "", &FileRange::All).unwrap_err();
    assert!(matches!(err, LsimError::FileNotFound(_)));
}
