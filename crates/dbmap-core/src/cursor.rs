//! Row cursor abstraction.
//!
//! Drivers expose result rows through [`RowCursor`]. The mapper hands the
//! cursor one [`ScanTarget`] per column, positionally aligned, and reads the
//! scanned values back out after each row.

use crate::error::{BoxError, Result};
use crate::value::Value;

/// Column metadata reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    pub name: String,
    /// Database type name as reported (e.g. `VARCHAR`, `int8`)
    pub database_type_name: String,
}

impl ColumnType {
    pub fn new(name: impl Into<String>, database_type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            database_type_name: database_type_name.into(),
        }
    }
}

/// Destination of one scanned column.
pub trait ScanTarget: Send {
    /// Store the scanned value.
    fn assign(&mut self, value: Value) -> Result<()>;

    /// Move the stored value out, leaving NULL behind.
    fn take(&mut self) -> Value;
}

/// Holds whatever value the cursor scans.
#[derive(Debug, Default)]
pub struct ValueSlot {
    value: Value,
}

impl ValueSlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScanTarget for ValueSlot {
    fn assign(&mut self, value: Value) -> Result<()> {
        self.value = value;
        Ok(())
    }

    fn take(&mut self) -> Value {
        std::mem::take(&mut self.value)
    }
}

/// Throwaway target for unmapped and NULL columns.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl ScanTarget for Discard {
    fn assign(&mut self, _value: Value) -> Result<()> {
        Ok(())
    }

    fn take(&mut self) -> Value {
        Value::Null
    }
}

/// A live result set.
pub trait RowCursor {
    fn column_types(&self) -> &[ColumnType];

    /// Move to the next row. `Ok(false)` once exhausted.
    fn advance(&mut self) -> std::result::Result<bool, BoxError>;

    /// Whether column `index` of the current row is NULL.
    fn is_null(&self, index: usize) -> bool;

    /// Scan the current row into `targets`, one per column.
    fn scan(&mut self, targets: &mut [Box<dyn ScanTarget>]) -> std::result::Result<(), BoxError>;
}
