use lsim_core::LsimError;
use lsim_params::{parse_bool_strict, ParameterStore};

fn store(pairs: &[(&str, &str)]) -> ParameterStore {
    let mut store = ParameterStore::new();
    for (name, value) in pairs {
        store.push(*name, *value);
    }
    store
}

#[test]
fn default_fallback_and_missing_required() {
    let store = store(&[("t_min", "20.0")]);
    assert_eq!(store.get_or::<f64>("size", 0.0).unwrap(), 0.0);
    let err = store.get::<f64>("size").unwrap_err();
    assert!(matches!(err, LsimError::MissingRequiredParameter(_)));
    assert_eq!(err.info().context.get("name").map(String::as_str), Some("size"));
}

#[test]
fn numeric_conversion_errors_are_invalid_type() {
    let store = store(&[("num_obs", "two"), ("t_max", "6o")]);
    assert!(matches!(
        store.get::<usize>("num_obs").unwrap_err(),
        LsimError::InvalidType(_)
    ));
    assert!(matches!(
        store.get_or::<f64>("t_max", 1.0).unwrap_err(),
        LsimError::InvalidType(_)
    ));
}

#[test]
fn numeric_literals_parse() {
    let store = store(&[("a", "-12"), ("b", "1e-3"), ("c", "60"), ("d", "inf")]);
    assert_eq!(store.get::<i32>("a").unwrap(), -12);
    assert_eq!(store.get::<f64>("b").unwrap(), 1e-3);
    assert_eq!(store.get::<f64>("c").unwrap(), 60.0);
    assert!(store.get::<f64>("d").unwrap().is_infinite());
    assert!(matches!(
        store.get::<u64>("a").unwrap_err(),
        LsimError::InvalidType(_)
    ));
}

#[test]
fn strings_pass_through() {
    let store = store(&[("out_folder", "./OUT")]);
    assert_eq!(store.get::<String>("out_folder").unwrap(), "./OUT");
}

#[test]
fn legacy_boolean_rule_accepts_only_fixed_literals() {
    for literal in ["true", "True", "TRUE", "1"] {
        let store = store(&[("stiff", literal)]);
        assert!(store.get::<bool>("stiff").unwrap(), "{literal}");
    }
    for literal in ["yes", "on", "tRuE", "2", "false", "0", "False"] {
        let store = store(&[("stiff", literal)]);
        assert!(!store.get::<bool>("stiff").unwrap(), "{literal}");
    }
}

#[test]
fn strict_boolean_rejects_unknown_literals() {
    let store = store(&[("a", "True"), ("b", "FALSE"), ("c", "yes")]);
    assert!(store.get_bool_strict("a").unwrap());
    assert!(!store.get_bool_strict("b").unwrap());
    assert!(matches!(
        store.get_bool_strict("c").unwrap_err(),
        LsimError::InvalidType(_)
    ));
    assert!(store.get_bool_strict_or("absent", true).unwrap());
    assert!(matches!(
        store.get_bool_strict("absent").unwrap_err(),
        LsimError::MissingRequiredParameter(_)
    ));
    assert!(parse_bool_strict("0") == Ok(false));
}

#[test]
fn list_values_split_on_commas() {
    let store = store(&[("weights", "0.5,1.5,,2"), ("ids", "3,4"), ("empty", ",")]);
    assert_eq!(store.get_vec::<f64>("weights").unwrap(), vec![0.5, 1.5, 2.0]);
    assert_eq!(store.get_vec::<i64>("ids").unwrap(), vec![3, 4]);
    assert!(matches!(
        store.get_vec::<f64>("empty").unwrap_err(),
        LsimError::InvalidType(_)
    ));
    assert_eq!(store.get_vec_or::<i64>("absent", vec![1]).unwrap(), vec![1]);
}

#[test]
fn is_set_reflects_entries() {
    let store = store(&[("shift", "true")]);
    assert!(store.is_set("shift"));
    assert!(!store.is_set("txt_out"));
    assert_eq!(store.raw("shift"), Some("true"));
}
