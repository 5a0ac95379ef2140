//! Fail-soft conversion of raw config values into typed values.

/// A type that a raw config string can be converted into.
///
/// Conversion failures are reported as `None`; callers substitute their default.
pub trait FromConfigValue: Sized {
    fn from_config_value(raw: &str) -> Option<Self>;
}

impl FromConfigValue for bool {
    fn from_config_value(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("true") {
            Some(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

macro_rules! impl_from_str_value {
    ($($ty:ty),*) => {
        $(
            impl FromConfigValue for $ty {
                fn from_config_value(raw: &str) -> Option<Self> {
                    raw.parse().ok()
                }
            }
        )*
    };
}

impl_from_str_value!(i16, i32, i64);

macro_rules! impl_finite_float_value {
    ($($ty:ty),*) => {
        $(
            impl FromConfigValue for $ty {
                fn from_config_value(raw: &str) -> Option<Self> {
                    raw.parse::<$ty>().ok().filter(|v| v.is_finite())
                }
            }
        )*
    };
}

impl_finite_float_value!(f32, f64);

/// Convert `raw`, falling back to `default` on absence or parse failure.
pub fn convert_or<T: FromConfigValue>(raw: Option<&str>, default: T) -> T {
    match raw {
        Some(value) if !value.is_empty() => T::from_config_value(value).unwrap_or(default),
        _ => default,
    }
}
