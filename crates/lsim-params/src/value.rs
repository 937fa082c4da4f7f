//! Conversion of raw parameter strings into typed values.

/// Literals the legacy boolean rule maps to `true`.
pub const TRUE_LITERALS: [&str; 4] = ["true", "True", "TRUE", "1"];

/// Literals the strict boolean rule maps to `false`.
pub const FALSE_LITERALS: [&str; 4] = ["false", "False", "FALSE", "0"];

/// Types that can be read from a raw parameter value.
pub trait ParameterValue: Sized {
    /// Name used in diagnostics.
    const TYPE_NAME: &'static str;

    /// Converts the raw string, returning a reason on failure.
    fn parse_parameter(raw: &str) -> Result<Self, String>;
}

macro_rules! numeric_parameter {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ParameterValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn parse_parameter(raw: &str) -> Result<Self, String> {
                    raw.parse::<$ty>().map_err(|err| err.to_string())
                }
            }
        )*
    };
}

numeric_parameter!(i32, i64, u32, u64, usize, f32, f64);

impl ParameterValue for String {
    const TYPE_NAME: &'static str = "string";

    fn parse_parameter(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

/// Legacy boolean rule.
///
/// Only the exact literals in [`TRUE_LITERALS`] are `true`. Every other
/// string, including `yes`, `on` or `false-ish` typos, silently becomes
/// `false` and never fails. Stages written against this rule depend on that
/// leniency; use [`parse_bool_strict`] (or
/// [`ParameterStore::get_bool_strict`](crate::ParameterStore::get_bool_strict))
/// where a typo should be an error instead.
impl ParameterValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn parse_parameter(raw: &str) -> Result<Self, String> {
        Ok(TRUE_LITERALS.contains(&raw))
    }
}

/// Strict boolean rule: only the literals in [`TRUE_LITERALS`] and
/// [`FALSE_LITERALS`] are accepted.
pub fn parse_bool_strict(raw: &str) -> Result<bool, String> {
    if TRUE_LITERALS.contains(&raw) {
        Ok(true)
    } else if FALSE_LITERALS.contains(&raw) {
        Ok(false)
    } else {
        Err(format!("`{raw}` is not a recognised boolean literal"))
    }
}

/// Splits a comma separated list, dropping empty elements.
pub fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty())
}
