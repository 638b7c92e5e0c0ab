//! Caller-supplied parameter values.

use serde::Serialize;
use serde_json::Value;

use crate::error::CallError;

/// A value bound to an operation parameter.
///
/// The variant decides how the value is coerced: path, query and header
/// positions use [`ParamValue::to_param_string`], the body position uses
/// [`ParamValue::to_body`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Text, used verbatim.
    String(String),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Raw bytes. Sent verbatim when bound to the body.
    Bytes(Vec<u8>),
    /// Any JSON-serializable structure.
    Json(Value),
}

impl ParamValue {
    /// Converts any serializable value into a [`ParamValue::Json`].
    ///
    /// # Errors
    ///
    /// Returns the serializer error if `value` cannot be represented as JSON.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Json)
    }

    /// String form used for path substitution, query strings and headers.
    #[must_use]
    pub fn to_param_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Self::Json(value) => json_to_param_string(value),
        }
    }

    /// Request body bytes for this value.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::BodySerialization`] when the value has no JSON
    /// representation (non-finite floats).
    pub fn to_body(&self) -> Result<Vec<u8>, CallError> {
        let serialized = match self {
            Self::Bytes(bytes) => return Ok(bytes.clone()),
            Self::String(s) => serde_json::to_vec(s),
            Self::Int(i) => serde_json::to_vec(i),
            Self::Bool(b) => serde_json::to_vec(b),
            Self::Float(f) => {
                let number = serde_json::Number::from_f64(*f).ok_or_else(|| {
                    CallError::BodySerialization {
                        message: format!("unsupported value: {f}"),
                    }
                })?;
                serde_json::to_vec(&number)
            }
            Self::Json(value) => serde_json::to_vec(value),
        };
        serialized.map_err(|e| CallError::BodySerialization {
            message: e.to_string(),
        })
    }
}

/// Coerces a JSON value to text: strings verbatim, `null` empty, anything
/// else as compact JSON.
#[must_use]
pub fn json_to_param_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<Vec<u8>> for ParamValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for ParamValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);
