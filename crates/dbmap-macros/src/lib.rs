//! Procedural macros for dbmap.
//!
//! `#[derive(Record)]` produces the static field declarations that
//! `dbmap-core` builds its catalogs from, plus by-name field accessors. With
//! `#[dbmap(table = "...")]` it also implements `Entity`.
//!
//! ```ignore
//! #[derive(Record, Default)]
//! #[dbmap(table = "t_order", pk = "id", sequence(oracle = "SEQ_ORDER.nextval"))]
//! pub struct Order {
//!     #[dbmap(column = "id")]
//!     pub id: String,
//!     #[dbmap(column = "amount")]
//!     pub amount: f64,
//!     #[dbmap(embed)]
//!     pub audit: Audit,
//!     #[dbmap(skip)]
//!     pub cached: Vec<String>,
//! }
//! ```
//!
//! Field attributes: `column` maps a column, `embed` merges another record's
//! fields, `skip` leaves the field out entirely. Fields that are not `pub`
//! are catalogued as private and never mapped to columns.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod record_derive;

/// Derive `Record` (and `Entity` when a table is given).
#[proc_macro_derive(Record, attributes(dbmap))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match record_derive::parse_record(&input) {
        Ok(def) => record_derive::generate_record_impl(&def).into(),
        Err(err) => err.to_compile_error().into(),
    }
}
