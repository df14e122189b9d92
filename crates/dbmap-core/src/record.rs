//! Record declarations.
//!
//! A record type describes its own fields through a static [`RecordDecl`],
//! normally generated by `#[derive(Record)]`. The catalog walks these
//! declarations instead of inspecting values at runtime.

use std::collections::HashMap;

use crate::error::Result;
use crate::value::Value;

/// Declared type-kind of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    Int8,
    Int16,
    Int32,
    /// Pointer-sized signed integer
    Int,
    Int64,
    Unsigned,
    Float32,
    Float64,
    Decimal,
    Text,
    Bytes,
    Date,
    Time,
    DateTime,
    Json,
    /// Embedded sub-record
    Record,
    Other,
}

impl FieldKind {
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            FieldKind::Int8
                | FieldKind::Int16
                | FieldKind::Int32
                | FieldKind::Int
                | FieldKind::Int64
                | FieldKind::Unsigned
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Int8 => "int8",
            FieldKind::Int16 => "int16",
            FieldKind::Int32 => "int32",
            FieldKind::Int => "int",
            FieldKind::Int64 => "int64",
            FieldKind::Unsigned => "unsigned",
            FieldKind::Float32 => "float32",
            FieldKind::Float64 => "float64",
            FieldKind::Decimal => "decimal",
            FieldKind::Text => "text",
            FieldKind::Bytes => "bytes",
            FieldKind::Date => "date",
            FieldKind::Time => "time",
            FieldKind::DateTime => "datetime",
            FieldKind::Json => "json",
            FieldKind::Record => "record",
            FieldKind::Other => "other",
        }
    }
}

/// One declared field of a record type.
#[derive(Debug, Clone, Copy)]
pub struct FieldDecl {
    /// Rust field name
    pub name: &'static str,
    pub kind: FieldKind,
    /// Persisted column name, if the field is mapped to one
    pub column: Option<&'static str>,
    /// Whether the field is `pub`
    pub exported: bool,
    pub nullable: bool,
    /// Declaration of the embedded record, for `#[dbmap(embed)]` fields
    pub embedded: Option<fn() -> &'static RecordDecl>,
}

impl FieldDecl {
    /// A plain exported field with no column mapping.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            column: None,
            exported: true,
            nullable: false,
            embedded: None,
        }
    }

    pub const fn column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }

    pub const fn private(mut self) -> Self {
        self.exported = false;
        self
    }

    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub const fn embed(mut self, decl: fn() -> &'static RecordDecl) -> Self {
        self.kind = FieldKind::Record;
        self.embedded = Some(decl);
        self
    }
}

/// Static structural description of a record type, in declaration order.
#[derive(Debug)]
pub struct RecordDecl {
    /// Fully-qualified type name, used in diagnostics
    pub type_name: &'static str,
    pub fields: &'static [FieldDecl],
}

/// A type whose fields can be read and written by name.
///
/// Field access is by Rust field name. Embedded records are searched after
/// the type's own fields, in declaration order.
pub trait Record: 'static {
    fn record_decl() -> &'static RecordDecl
    where
        Self: Sized;

    /// Current value of a field, or `None` when no such field exists.
    fn get_field(&self, name: &str) -> Option<Value>;

    /// Assign a field. Returns `Ok(false)` when no such field exists.
    fn set_field(&mut self, name: &str, value: Value) -> Result<bool>;
}

/// A record bound to a table.
pub trait Entity: Record {
    fn table_name(&self) -> &str;

    /// Primary key column as declared; may carry quoting characters.
    fn pk_column_name(&self) -> &str;

    /// Dialect name → sequence expression for the primary key. An empty
    /// expression means the key is filled by a trigger.
    fn pk_sequence(&self) -> Option<HashMap<String, String>> {
        None
    }
}
