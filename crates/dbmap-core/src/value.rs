//! Dynamic SQL values.
//!
//! `Value` is the closed set of shapes that travel between records, SQL
//! parameters and row cursors. `FieldType` ties a Rust field type to its
//! declared [`FieldKind`] and converts in both directions.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::record::FieldKind;

/// A dynamically-typed SQL value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,
    Bool(bool),
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    /// Exact numeric (DECIMAL/NUMERIC)
    Decimal(Decimal),
    Text(String),
    /// Raw bytes, also what many drivers hand back for untyped columns
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Json(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this is the zero value of its type.
    ///
    /// Used for "let the database assign" primary keys and for updates that
    /// skip untouched columns. NULL counts as zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !*b,
            Value::TinyInt(v) => *v == 0,
            Value::SmallInt(v) => *v == 0,
            Value::Int(v) => *v == 0,
            Value::BigInt(v) => *v == 0,
            Value::Float(v) => v.to_bits() == 0,
            Value::Double(v) => v.to_bits() == 0,
            Value::Decimal(d) => d.is_zero(),
            Value::Text(s) => s.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            Value::Date(d) => *d == NaiveDate::default(),
            Value::Time(t) => *t == NaiveTime::default(),
            Value::Timestamp(ts) => *ts == NaiveDateTime::default(),
            Value::Json(j) => j.is_null(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view across all integer widths.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::TinyInt(v) => Some(i64::from(*v)),
            Value::SmallInt(v) => Some(i64::from(*v)),
            Value::Int(v) => Some(i64::from(*v)),
            Value::BigInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "bool",
            Value::TinyInt(_) => "tinyint",
            Value::SmallInt(_) => "smallint",
            Value::Int(_) => "int",
            Value::BigInt(_) => "bigint",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Timestamp(_) => "timestamp",
            Value::Json(_) => "json",
        }
    }
}

/// A Rust type that can be stored in a record field.
///
/// Implemented for the builtin scalar types; `Option<T>` marks the field as
/// nullable. Types outside this set can implement it with `FieldKind::Other`.
pub trait FieldType: Sized {
    const KIND: FieldKind;
    const NULLABLE: bool = false;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch(expected: &str, value: &Value) -> Error {
    Error::conversion(
        "from_value",
        format!("expected {}, found {}", expected, value.type_name()),
    )
}

fn out_of_range(expected: &str, value: &Value) -> Error {
    Error::conversion(
        "from_value",
        format!("{:?} does not fit in {}", value, expected),
    )
}

macro_rules! impl_int_field {
    ($ty:ty, $kind:expr, $variant:ident, $name:literal) => {
        impl FieldType for $ty {
            const KIND: FieldKind = $kind;

            fn to_value(&self) -> Value {
                Value::$variant((*self).into())
            }

            fn from_value(value: Value) -> Result<Self> {
                let Some(wide) = value.as_i64() else {
                    return match value {
                        Value::Bool(b) => Ok(<$ty>::from(b)),
                        other => Err(mismatch($name, &other)),
                    };
                };
                <$ty>::try_from(wide).map_err(|_| out_of_range($name, &value))
            }
        }
    };
}

impl_int_field!(i8, FieldKind::Int8, TinyInt, "i8");
impl_int_field!(i16, FieldKind::Int16, SmallInt, "i16");
impl_int_field!(i32, FieldKind::Int32, Int, "i32");
impl_int_field!(i64, FieldKind::Int64, BigInt, "i64");

impl FieldType for isize {
    const KIND: FieldKind = FieldKind::Int;

    fn to_value(&self) -> Value {
        Value::BigInt(*self as i64)
    }

    fn from_value(value: Value) -> Result<Self> {
        let wide = value.as_i64().ok_or_else(|| mismatch("isize", &value))?;
        isize::try_from(wide).map_err(|_| out_of_range("isize", &value))
    }
}

macro_rules! impl_unsigned_field {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl FieldType for $ty {
            const KIND: FieldKind = FieldKind::Unsigned;

            fn to_value(&self) -> Value {
                Value::$variant((*self).into())
            }

            fn from_value(value: Value) -> Result<Self> {
                let wide = value.as_i64().ok_or_else(|| mismatch($name, &value))?;
                <$ty>::try_from(wide).map_err(|_| out_of_range($name, &value))
            }
        }
    };
}

impl_unsigned_field!(u8, SmallInt, "u8");
impl_unsigned_field!(u16, Int, "u16");
impl_unsigned_field!(u32, BigInt, "u32");

impl FieldType for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => other
                .as_i64()
                .map(|v| v != 0)
                .ok_or_else(|| mismatch("bool", &other)),
        }
    }
}

impl FieldType for f32 {
    const KIND: FieldKind = FieldKind::Float32;

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Double(v) => Ok(v as f32),
            other => other
                .as_i64()
                .map(|v| v as f32)
                .ok_or_else(|| mismatch("f32", &other)),
        }
    }
}

impl FieldType for f64 {
    const KIND: FieldKind = FieldKind::Float64;

    fn to_value(&self) -> Value {
        Value::Double(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float(v) => Ok(f64::from(v)),
            Value::Double(v) => Ok(v),
            other => other
                .as_i64()
                .map(|v| v as f64)
                .ok_or_else(|| mismatch("f64", &other)),
        }
    }
}

impl FieldType for Decimal {
    const KIND: FieldKind = FieldKind::Decimal;

    fn to_value(&self) -> Value {
        Value::Decimal(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(d) => Ok(d),
            Value::Text(ref s) => s
                .trim()
                .parse::<Decimal>()
                .map_err(|_| mismatch("decimal", &value)),
            other => other
                .as_i64()
                .map(Decimal::from)
                .ok_or_else(|| mismatch("decimal", &other)),
        }
    }
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            Value::Bytes(bytes) => String::from_utf8(bytes).map_err(|e| {
                Error::Conversion(crate::error::ConversionError {
                    op: "from_value",
                    column: None,
                    message: "bytes are not valid UTF-8".to_string(),
                    source: Some(Box::new(e)),
                })
            }),
            other => Err(mismatch("text", &other)),
        }
    }
}

impl FieldType for Vec<u8> {
    const KIND: FieldKind = FieldKind::Bytes;

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(b) => Ok(b),
            Value::Text(s) => Ok(s.into_bytes()),
            other => Err(mismatch("bytes", &other)),
        }
    }
}

macro_rules! impl_temporal_field {
    ($ty:ty, $kind:expr, $variant:ident, $name:literal) => {
        impl FieldType for $ty {
            const KIND: FieldKind = $kind;

            fn to_value(&self) -> Value {
                Value::$variant(*self)
            }

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(mismatch($name, &other)),
                }
            }
        }
    };
}

impl_temporal_field!(NaiveDate, FieldKind::Date, Date, "date");
impl_temporal_field!(NaiveTime, FieldKind::Time, Time, "time");
impl_temporal_field!(NaiveDateTime, FieldKind::DateTime, Timestamp, "timestamp");

impl FieldType for serde_json::Value {
    const KIND: FieldKind = FieldKind::Json;

    fn to_value(&self) -> Value {
        Value::Json(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Json(j) => Ok(j),
            Value::Text(ref s) => serde_json::from_str(s).map_err(|e| {
                Error::Conversion(crate::error::ConversionError {
                    op: "from_value",
                    column: None,
                    message: "text is not valid JSON".to_string(),
                    source: Some(Box::new(e)),
                })
            }),
            other => Err(mismatch("json", &other)),
        }
    }
}

impl<T: FieldType> FieldType for Option<T> {
    const KIND: FieldKind = T::KIND;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty),+ $(,)?) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                v.to_value()
            }
        })+
    };
}

impl_from_for_value!(
    bool,
    i8,
    i16,
    i32,
    i64,
    f32,
    f64,
    Decimal,
    String,
    Vec<u8>,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl<T: FieldType> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.to_value()
    }
}
