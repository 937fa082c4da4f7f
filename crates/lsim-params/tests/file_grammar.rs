mod common;

use lsim_params::{
    export, parse_override, parse_parameter_text, render_export, resolve_file, ParameterStore,
};
use proptest::prelude::*;

use common::parameter_file;

#[test]
fn malformed_and_comment_lines_contribute_nothing() {
    let entries = parse_parameter_text("justoneword\n# comment a b\n");
    assert!(entries.is_empty());
}

#[test]
fn grammar_skips_blank_three_token_and_indented_comments() {
    let text = "\n\
        out_folder ./OUT\n\
        \t# indented comment\n\
        t_min 20 extra\n\
        \n\
        \tnum_obs\t2  \n";
    let entries = parse_parameter_text(text);
    let pairs: Vec<_> = entries
        .iter()
        .map(|e| (e.name.as_str(), e.value.as_str()))
        .collect();
    assert_eq!(pairs, vec![("out_folder", "./OUT"), ("num_obs", "2")]);
}

#[test]
fn override_token_shapes() {
    let entry = parse_override("-Pfile_range=0-99,200-299").unwrap();
    assert_eq!(entry.name, "file_range");
    assert_eq!(entry.value, "0-99,200-299");
    assert!(parse_override("-Pa=b=c").is_some());
    assert!(parse_override("-Pa b=c").is_none());
    assert!(parse_override("-p a=b").is_none());
    assert!(parse_override("Pa=b").is_none());
}

#[test]
fn resolve_file_reads_without_overrides() {
    let (_dir, path) = parameter_file("# header\nnum_sim 20000\n");
    let mut store = ParameterStore::new();
    let summary = resolve_file(&mut store, &path).unwrap();
    assert_eq!(summary.file_entries, 1);
    assert_eq!(summary.overrides, 0);
    assert_eq!(store.get::<u64>("num_sim").unwrap(), 20000);
}

#[test]
fn export_reparses_to_same_entries() {
    let mut store = ParameterStore::new();
    store.push("mode", "7");
    store.push("mode", "5");
    store.push("out_folder", "./OUT");
    let command = vec!["main_kernel".to_string(), "parameter.txt".to_string()];
    let rendered = render_export(&store, &command);
    assert!(rendered.starts_with("# File generated on UTC "));
    assert!(rendered.contains("# by command: main_kernel parameter.txt"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("exported.txt");
    export(&store, &path, &command).unwrap();
    let mut reread = ParameterStore::new();
    resolve_file(&mut reread, &path).unwrap();
    assert_eq!(reread.entries(), store.entries());
    assert_eq!(reread.get::<i64>("mode").unwrap(), 7);
}

proptest! {
    #[test]
    fn well_formed_lines_always_parse(
        name in "[A-Za-z_][A-Za-z0-9_]{0,12}",
        value in "[!-~]{1,12}",
    ) {
        let text = format!("{name} {value}\n");
        let entries = parse_parameter_text(&text);
        prop_assert_eq!(entries.len(), 1);
        prop_assert_eq!(&entries[0].name, &name);
        prop_assert_eq!(&entries[0].value, &value);
    }
}
