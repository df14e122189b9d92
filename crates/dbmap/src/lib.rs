//! Dialect-aware record to SQL mapping.
//!
//! `dbmap` is the user-facing crate. It re-exports the record contract and
//! row mapping from `dbmap-core`, the statement builders from `dbmap-query`
//! and `#[derive(Record)]` from `dbmap-macros`.
//!
//! # Quick Start
//!
//! ```
//! use dbmap::prelude::*;
//!
//! #[derive(Record, Debug, Default)]
//! #[dbmap(table = "t_user", pk = "id", crate = "dbmap::dbmap_core")]
//! pub struct User {
//!     #[dbmap(column = "id")]
//!     pub id: i64,
//!     #[dbmap(column = "user_name")]
//!     pub name: String,
//! }
//!
//! let mut user = User { id: 0, name: "ann".to_string() };
//! let stmt = SqlBuilder::new(Dialect::Postgresql).insert(&mut user).unwrap();
//! assert_eq!(stmt.sql, "INSERT INTO t_user(user_name) VALUES ($1)");
//! assert!(stmt.database_key);
//! ```
//!
//! The derive refers to `::dbmap_core` unless told otherwise; crates that
//! only depend on `dbmap` pass `crate = "dbmap::dbmap_core"` as above.
//!
//! Nothing here executes SQL. A driver implements [`RowCursor`] and runs the
//! returned [`Statement`]s; [`RowMapper`] turns its rows back into records.

pub use dbmap_core;
pub use dbmap_query;

pub use dbmap_core::{
    BoxError, ColumnConverter, ColumnType, ConversionError, Destination, DestinationShape,
    Dialect, Discard, Entity, EntityMap, Error, FieldCatalog, FieldDecl, FieldDescriptor,
    FieldKind, FieldType, PaginationStyle, PkKind, PkStrategy, PlaceholderStyle, PrimaryKeyPlan,
    Record, RecordDecl, Result, RowCursor, RowMapper, ScanPlan, ScanSlot, ScanTarget,
    UnsupportedKind, Value, ValueSlot, assign_column, column_converter, convert_column_value,
    default_string_id, field_value, generate_string_id, query_all, query_maps, query_one,
    register_column_converter, reset_id_generator, resolve_pk_field, set_id_generator,
    strip_identifier_quotes, unregister_column_converter,
};
pub use dbmap_macros::Record;
pub use dbmap_query::{
    BuilderConfig, InsertParts, InsertStatement, Page, QueryContext, SqlBuilder, Statement,
    paginate, rebind, rewrite_mutation, wrap_count_sql,
};

pub use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
pub use rust_decimal::Decimal;

/// Everything needed to declare records and build statements.
pub mod prelude {
    pub use crate::{
        BuilderConfig, Dialect, Entity, EntityMap, Error, FieldType, InsertStatement, Page,
        QueryContext, Record, Result, RowCursor, RowMapper, SqlBuilder, Statement, Value,
        query_all, query_one,
    };
}
