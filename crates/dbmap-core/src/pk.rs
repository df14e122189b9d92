//! Primary key resolution.
//!
//! Decides how a record's key takes part in an INSERT: bound like any other
//! column, left to the database (auto-increment or trigger), or filled from a
//! vendor sequence expression.

use std::collections::HashMap;

use crate::catalog::{FieldCatalog, FieldDescriptor};
use crate::dialect::Dialect;
use crate::error::{Error, Result, UnsupportedKind};
use crate::record::FieldKind;

/// Storage kind of a primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PkKind {
    Text,
    /// 8, 16, 32-bit or pointer-sized integer
    Int32,
    Int64,
}

impl PkKind {
    pub fn classify(field: &FieldDescriptor) -> Result<PkKind> {
        match field.kind {
            FieldKind::Text => Ok(PkKind::Text),
            FieldKind::Int8 | FieldKind::Int16 | FieldKind::Int32 | FieldKind::Int => {
                Ok(PkKind::Int32)
            }
            FieldKind::Int64 => Ok(PkKind::Int64),
            other => Err(Error::unsupported(
                "classify_pk",
                UnsupportedKind::PrimaryKeyType,
                format!(
                    "primary key field `{}` has kind {}; only text and signed integers are supported",
                    field.name,
                    other.as_str()
                ),
            )),
        }
    }
}

/// How the key value is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PkStrategy {
    /// Bound from the record, generated client-side when empty text
    Assigned,
    /// Zero numeric key left to the database
    AutoIncrement,
    /// Vendor expression written literally in place of a placeholder
    Sequence(String),
    /// Filled by a database trigger; the column is omitted
    Trigger,
}

impl PkStrategy {
    /// Strategy registered for `dialect`, or `None` when the dialect has no
    /// entry and the decision depends on the runtime value.
    pub fn from_sequence(
        sequences: Option<&HashMap<String, String>>,
        dialect: &Dialect,
    ) -> Option<PkStrategy> {
        let expr = sequences?.get(dialect.name())?;
        if expr.is_empty() {
            Some(PkStrategy::Trigger)
        } else {
            Some(PkStrategy::Sequence(expr.clone()))
        }
    }
}

/// Resolved primary key of one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeyPlan {
    /// Rust field name
    pub field: &'static str,
    /// Lowercased column name
    pub column: String,
    pub kind: PkKind,
    pub strategy: PkStrategy,
}

impl PrimaryKeyPlan {
    /// Whether the key column is left out of the column list.
    pub fn omits_column(&self) -> bool {
        matches!(
            self.strategy,
            PkStrategy::Trigger | PkStrategy::AutoIncrement
        )
    }
}

/// Strip vendor quoting from a declared key column.
pub fn strip_identifier_quotes(column: &str) -> String {
    column
        .chars()
        .filter(|c| !matches!(c, '"' | '`' | '[' | ']'))
        .collect()
}

/// Field mapped to the declared primary key column, if any.
pub fn resolve_pk_field<'a>(
    catalog: &'a FieldCatalog,
    declared_column: &str,
) -> Option<&'a FieldDescriptor> {
    let column = strip_identifier_quotes(declared_column);
    let field = catalog.field_by_column(column.trim());
    if field.is_none() {
        tracing::trace!(
            record = catalog.type_name(),
            column = declared_column,
            "Primary key column is not mapped"
        );
    }
    field
}
