//! Core types and traits for dbmap.
//!
//! `dbmap-core` is the **foundation layer** of the workspace. It defines the
//! record contract, the dynamic value type and everything that needs a
//! record's structure: field catalogs, primary key resolution and result row
//! mapping.
//!
//! # Role In The Architecture
//!
//! - **Record contract**: `Record` and `Entity` are implemented by user types,
//!   normally through `#[derive(Record)]` from `dbmap-macros`.
//! - **Structure cache**: `FieldCatalog` describes each record type once and is
//!   shared for the life of the process.
//! - **Row mapping**: `RowCursor` is implemented by drivers; `RowMapper` scans
//!   rows into records or scalars, with per-type `ColumnConverter` hooks.
//!
//! # Who Uses This Crate
//!
//! - `dbmap-macros` generates `Record`/`Entity` implementations defined here.
//! - `dbmap-query` consumes catalogs, primary key plans and `Value` to build SQL.
//!
//! Most applications should use the `dbmap` facade.

pub mod catalog;
pub mod convert;
pub mod cursor;
pub mod dialect;
pub mod entity_map;
pub mod error;
pub mod id;
pub mod mapper;
pub mod pk;
pub mod record;
pub mod value;

#[cfg(test)]
mod fixtures;

pub use catalog::{FieldCatalog, FieldDescriptor, assign_column, field_value};
pub use convert::{
    ColumnConverter, column_converter, convert_column_value, register_column_converter,
    unregister_column_converter,
};
pub use cursor::{ColumnType, Discard, RowCursor, ScanTarget, ValueSlot};
pub use dialect::{Dialect, PaginationStyle, PlaceholderStyle};
pub use entity_map::EntityMap;
pub use error::{BoxError, ConversionError, Error, Result, UnsupportedKind};
pub use id::{default_string_id, generate_string_id, reset_id_generator, set_id_generator};
pub use mapper::{
    Destination, DestinationShape, RowMapper, ScanPlan, ScanSlot, query_all, query_maps, query_one,
};
pub use pk::{PkKind, PkStrategy, PrimaryKeyPlan, resolve_pk_field, strip_identifier_quotes};
pub use record::{Entity, FieldDecl, FieldKind, Record, RecordDecl};
pub use value::{FieldType, Value};
