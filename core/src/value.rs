//! Value codec: converting raw argument text into typed values.
//!
//! Static decoding goes through the [`FromValue`] trait, which is implemented
//! for strings, paths, booleans and every primitive integer and float type.
//! Asking for a type without an implementation is a compile error rather than
//! a runtime failure.
//!
//! Runtime-typed decoding (for schemas described in data files) goes through
//! [`ValueKind::decode`], which dispatches to the same implementations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Conversion from a raw argument string.
///
/// # Examples
///
/// ```
/// use argscope_core::FromValue;
///
/// assert_eq!(i32::decode("-3").unwrap(), -3);
/// assert_eq!(f64::decode("3.14").unwrap(), 3.14);
/// assert_eq!(String::decode("hello world").unwrap(), "hello world");
/// assert!(u8::decode("300").is_err());
/// ```
pub trait FromValue: Sized {
    /// Short name of the target type, used in diagnostics.
    const TYPE_NAME: &'static str;

    /// Decodes `raw` into `Self`.
    fn decode(raw: &str) -> Result<Self, DecodeError>;
}

impl FromValue for String {
    const TYPE_NAME: &'static str = "string";

    fn decode(raw: &str) -> Result<Self, DecodeError> {
        Ok(raw.to_string())
    }
}

impl FromValue for PathBuf {
    const TYPE_NAME: &'static str = "path";

    fn decode(raw: &str) -> Result<Self, DecodeError> {
        Ok(PathBuf::from(raw))
    }
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn decode(raw: &str) -> Result<Self, DecodeError> {
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(DecodeError::new(
                raw,
                Self::TYPE_NAME,
                "expected true/false, yes/no, on/off or 1/0",
            )),
        }
    }
}

macro_rules! from_str_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn decode(raw: &str) -> Result<Self, DecodeError> {
                    raw.parse::<$ty>()
                        .map_err(|e| DecodeError::new(raw, Self::TYPE_NAME, e.to_string()))
                }
            }
        )*
    };
}

from_str_value!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

/// Target type of a value declared at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Passed through verbatim (the default).
    #[default]
    String,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit float.
    Float,
    /// Boolean, see the [`bool`] implementation of [`FromValue`].
    Boolean,
}

/// A decoded value of a [`ValueKind`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl ValueKind {
    /// Decodes `raw` according to this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use argscope_core::{TypedValue, ValueKind};
    ///
    /// assert_eq!(ValueKind::Integer.decode("10").unwrap(), TypedValue::Integer(10));
    /// assert!(ValueKind::Float.decode("abc").is_err());
    /// ```
    pub fn decode(self, raw: &str) -> Result<TypedValue, DecodeError> {
        Ok(match self {
            Self::String => TypedValue::String(String::decode(raw)?),
            Self::Integer => TypedValue::Integer(i64::decode(raw)?),
            Self::Float => TypedValue::Float(f64::decode(raw)?),
            Self::Boolean => TypedValue::Boolean(bool::decode(raw)?),
        })
    }
}
