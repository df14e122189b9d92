//! Column value conversion.
//!
//! Two mechanisms live here: a process-wide registry of [`ColumnConverter`]s
//! keyed by upper-cased database type name, consulted by the row mapper for
//! every column, and [`convert_column_value`], a fallback that decodes raw
//! byte payloads some drivers return for untyped columns.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::cursor::{ColumnType, ScanTarget};
use crate::error::{BoxError, ConversionError, Error, Result};
use crate::value::Value;

/// Custom conversion for one database column type.
pub trait ColumnConverter: Send + Sync {
    /// Intermediate target the column is scanned into. `Ok(None)` is treated
    /// as a conversion failure.
    fn scan_target(
        &self,
        column: &ColumnType,
    ) -> std::result::Result<Option<Box<dyn ScanTarget>>, BoxError>;

    /// Turn the scanned intermediate value into the final value. `Ok(None)`
    /// is treated as a conversion failure.
    fn convert(
        &self,
        column: &ColumnType,
        scanned: Value,
    ) -> std::result::Result<Option<Value>, BoxError>;
}

static CONVERTERS: LazyLock<RwLock<HashMap<String, Arc<dyn ColumnConverter>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Register a converter for a database type name (case-insensitive).
/// Replaces any converter already registered for that name.
pub fn register_column_converter(
    database_type_name: &str,
    converter: impl ColumnConverter + 'static,
) {
    let key = database_type_name.trim().to_uppercase();
    tracing::debug!(type_name = %key, "Registered column converter");
    CONVERTERS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key, Arc::new(converter));
}

/// Remove the converter for a database type name, returning whether one was
/// registered.
pub fn unregister_column_converter(database_type_name: &str) -> bool {
    let key = database_type_name.trim().to_uppercase();
    CONVERTERS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&key)
        .is_some()
}

/// Converter registered for a database type name.
pub fn column_converter(database_type_name: &str) -> Option<Arc<dyn ColumnConverter>> {
    let cache = CONVERTERS.read().unwrap_or_else(PoisonError::into_inner);
    if cache.is_empty() {
        return None;
    }
    cache.get(&database_type_name.to_uppercase()).cloned()
}

/// Request the intermediate scan target from `converter`.
pub(crate) fn converter_target(
    converter: &dyn ColumnConverter,
    column: &ColumnType,
) -> Result<Box<dyn ScanTarget>> {
    match converter.scan_target(column) {
        Ok(Some(target)) => Ok(target),
        Ok(None) => Err(Error::conversion(
            "scan_target",
            format!(
                "converter for {} returned no scan target",
                column.database_type_name
            ),
        )
        .with_column(&column.name)),
        Err(source) => Err(converter_error("scan_target", column, source)),
    }
}

/// Run the final conversion step of `converter`.
pub(crate) fn converter_finish(
    converter: &dyn ColumnConverter,
    column: &ColumnType,
    scanned: Value,
) -> Result<Value> {
    match converter.convert(column, scanned) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(Error::conversion(
            "convert",
            format!("converter for {} returned no value", column.database_type_name),
        )
        .with_column(&column.name)),
        Err(source) => Err(converter_error("convert", column, source)),
    }
}

fn converter_error(op: &'static str, column: &ColumnType, source: BoxError) -> Error {
    tracing::warn!(
        column = %column.name,
        type_name = %column.database_type_name,
        error = %source,
        "Column converter failed"
    );
    Error::Conversion(ConversionError {
        op,
        column: Some(column.name.clone()),
        message: format!("converter for {} failed", column.database_type_name),
        source: Some(source),
    })
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Decode a raw byte payload according to the column's database type name.
///
/// Only non-empty `Value::Bytes` inputs are decoded; every other value, and
/// bytes for unrecognized type names, pass through unchanged.
pub fn convert_column_value(raw: Value, database_type_name: &str) -> Result<Value> {
    let bytes = match raw {
        Value::Bytes(bytes) if !bytes.is_empty() => bytes,
        other => return Ok(other),
    };
    let type_name = database_type_name.trim().to_uppercase();

    let converted = match type_name.as_str() {
        "CHAR" | "NCHAR" | "VARCHAR" | "NVARCHAR" | "VARCHAR2" | "NVARCHAR2" | "TINYTEXT"
        | "MEDIUMTEXT" | "TEXT" | "NTEXT" | "LONGTEXT" | "LONG" => Value::Text(text(&bytes)?),
        "INT" | "INT4" | "INTEGER" | "SERIAL" | "TINYINT" | "BIT" | "SMALLINT" | "SMALLSERIAL"
        | "INT2" => Value::Int(parse_int(&bytes, &type_name)?),
        "BIGINT" | "BIGSERIAL" | "INT8" => Value::BigInt(parse(&bytes, "int64")?),
        "FLOAT" | "REAL" => Value::Float(parse(&bytes, "float32")?),
        "DOUBLE" => Value::Double(parse(&bytes, "float64")?),
        "DECIMAL" | "NUMBER" | "NUMERIC" | "DEC" => Value::Decimal(parse_decimal(&bytes)?),
        "DATE" => Value::Date(
            NaiveDate::parse_from_str(text(&bytes)?.trim(), DATE_FORMAT)
                .map_err(|e| parse_error("date", e))?,
        ),
        "TIME" => Value::Time(
            NaiveTime::parse_from_str(text(&bytes)?.trim(), TIME_FORMAT)
                .map_err(|e| parse_error("time", e))?,
        ),
        "DATETIME" => Value::Timestamp(
            NaiveDateTime::parse_from_str(text(&bytes)?.trim(), DATETIME_FORMAT)
                .map_err(|e| parse_error("datetime", e))?,
        ),
        "TIMESTAMP" => Value::Timestamp(
            NaiveDateTime::parse_from_str(text(&bytes)?.trim(), TIMESTAMP_FORMAT)
                .map_err(|e| parse_error("timestamp", e))?,
        ),
        "BOOLEAN" | "BOOL" => Value::Bool(parse_bool(&bytes)?),
        _ => Value::Bytes(bytes),
    };
    Ok(converted)
}

fn text(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| parse_error("text", e))
}

fn parse<T>(bytes: &[u8], target: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text(bytes)?
        .trim()
        .parse::<T>()
        .map_err(|e| parse_error(target, e))
}

fn parse_int(bytes: &[u8], type_name: &str) -> Result<i32> {
    match parse::<i32>(bytes, "int32") {
        Ok(v) => Ok(v),
        // MySQL BIT columns arrive as big-endian binary, not digits
        Err(_) if type_name == "BIT" && bytes.len() <= 4 => {
            Ok(bytes.iter().fold(0_i32, |acc, b| (acc << 8) | i32::from(*b)))
        }
        Err(e) => Err(e),
    }
}

fn parse_decimal(bytes: &[u8]) -> Result<Decimal> {
    let s = text(bytes)?;
    let s = s.trim();
    Decimal::from_str_exact(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|e| parse_error("decimal", e))
}

fn parse_bool(bytes: &[u8]) -> Result<bool> {
    if let [single] = bytes {
        match single {
            0 | b'0' | b'f' | b'F' => return Ok(false),
            1 | b'1' | b't' | b'T' => return Ok(true),
            _ => {}
        }
    }
    let s = text(bytes)?;
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        other => Err(Error::conversion(
            "convert_column_value",
            format!("`{}` is not a boolean", other),
        )),
    }
}

fn parse_error(target: &str, source: impl std::error::Error + Send + Sync + 'static) -> Error {
    Error::Conversion(ConversionError {
        op: "convert_column_value",
        column: None,
        message: format!("cannot decode bytes as {}", target),
        source: Some(Box::new(source)),
    })
}
