//! SQL generation for dbmap.
//!
//! `dbmap-query` turns records and key/value maps into dialect-correct
//! statements with positional parameters. It never executes anything; the
//! caller hands [`Statement`]s to a driver.
//!
//! # Role In The Architecture
//!
//! - **Builders**: [`SqlBuilder`] emits INSERT (single, batch, map), UPDATE,
//!   DELETE, paginated SELECT and COUNT statements.
//! - **Dialect post-processing**: [`rebind`], [`paginate`] and
//!   [`rewrite_mutation`] adapt generic `?` SQL to one database.
//! - **Per-call options**: [`QueryContext`] carries optimizer hints.
//!
//! Record structure comes from `dbmap-core`'s `FieldCatalog`; this crate only
//! reads it.

pub mod builder;
pub mod config;
pub mod context;
pub mod page;
pub mod rebind;

pub use builder::{InsertParts, InsertStatement, SqlBuilder, Statement};
pub use config::BuilderConfig;
pub use context::QueryContext;
pub use page::Page;
pub use rebind::{
    find_group_by, find_order_by, find_select_from, paginate, quote_text_placeholders, rebind,
    rewrite_mutation, wrap_count_sql,
};
