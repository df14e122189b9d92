//! Cached structural description of record types.
//!
//! A [`FieldCatalog`] is built once per record type from its static
//! [`RecordDecl`] and shared through an `Arc` for the rest of the program.
//! Embedded records are merged depth-first after the type's own fields; a
//! field name claimed by a closer declaration shadows deeper ones.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use crate::error::{Error, Result};
use crate::record::{FieldDecl, FieldKind, Record, RecordDecl};
use crate::value::Value;

/// Cached metadata for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust field name
    pub name: &'static str,
    pub kind: FieldKind,
    pub column: Option<&'static str>,
    pub nullable: bool,
}

impl From<&FieldDecl> for FieldDescriptor {
    fn from(decl: &FieldDecl) -> Self {
        Self {
            name: decl.name,
            kind: decl.kind,
            column: decl.column,
            nullable: decl.nullable,
        }
    }
}

/// Structural description of a record type.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    type_name: &'static str,
    export_fields: HashMap<String, FieldDescriptor>,
    export_order: Vec<String>,
    private_fields: HashMap<String, FieldDescriptor>,
    columns: HashMap<String, FieldDescriptor>,
    ordered_columns: Vec<String>,
}

static CATALOGS: LazyLock<RwLock<HashMap<TypeId, Arc<FieldCatalog>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

impl FieldCatalog {
    /// Catalog for `R`, introspected on first use.
    ///
    /// Concurrent first use may introspect more than once, but only the first
    /// published catalog is ever handed out.
    pub fn of<R: Record>() -> Result<Arc<FieldCatalog>> {
        let type_id = TypeId::of::<R>();

        // Fast path: already cached
        {
            let cache = CATALOGS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(catalog) = cache.get(&type_id) {
                return Ok(Arc::clone(catalog));
            }
        }

        let built = Arc::new(Self::introspect(R::record_decl())?);
        let mut cache = CATALOGS.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(type_id).or_insert(built)))
    }

    /// Build a catalog from a declaration without touching the cache.
    pub fn introspect(decl: &'static RecordDecl) -> Result<FieldCatalog> {
        if decl.fields.is_empty() {
            return Err(Error::structure(
                "introspect",
                format!("record `{}` declares no fields", decl.type_name),
            ));
        }

        let mut catalog = FieldCatalog {
            type_name: decl.type_name,
            export_fields: HashMap::new(),
            export_order: Vec::new(),
            private_fields: HashMap::new(),
            columns: HashMap::new(),
            ordered_columns: Vec::new(),
        };
        let mut claimed: HashSet<&'static str> = HashSet::new();
        let mut visited: HashSet<&'static str> = HashSet::from([decl.type_name]);

        // Own fields claim their names first. Embedded fields are descended
        // into even when their own name was already taken.
        let mut embedded = Vec::new();
        for field in decl.fields {
            if claimed.insert(field.name) {
                catalog.register(field);
            }
            if let Some(embed) = field.embedded {
                embedded.push(embed);
            }
        }
        catalog.merge_embedded(&embedded, &mut claimed, &mut visited);

        tracing::debug!(
            record = decl.type_name,
            columns = catalog.ordered_columns.len(),
            exported = catalog.export_fields.len(),
            private = catalog.private_fields.len(),
            "Introspected record"
        );
        Ok(catalog)
    }

    fn merge_embedded(
        &mut self,
        embedded: &[fn() -> &'static RecordDecl],
        claimed: &mut HashSet<&'static str>,
        visited: &mut HashSet<&'static str>,
    ) {
        for embed in embedded {
            let decl = embed();
            if !visited.insert(decl.type_name) {
                continue;
            }
            let mut nested = Vec::new();
            for field in decl.fields {
                if claimed.insert(field.name) {
                    self.register(field);
                }
                if let Some(inner) = field.embedded {
                    nested.push(inner);
                }
            }
            self.merge_embedded(&nested, claimed, visited);
        }
    }

    fn register(&mut self, field: &FieldDecl) {
        let descriptor = FieldDescriptor::from(field);
        let key = field.name.to_lowercase();
        if !field.exported {
            self.private_fields.insert(key, descriptor);
            return;
        }
        if let Some(column) = field.column.filter(|c| !c.is_empty()) {
            let column = column.to_lowercase();
            tracing::trace!(record = self.type_name, field = field.name, column = %column, "Registered column");
            self.columns.insert(column.clone(), descriptor.clone());
            self.ordered_columns.push(column);
        }
        self.export_order.push(key.clone());
        self.export_fields.insert(key, descriptor);
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Lowercased column name → field.
    pub fn column_field_map(&self) -> &HashMap<String, FieldDescriptor> {
        &self.columns
    }

    /// Lowercased column names in declaration order.
    pub fn ordered_columns(&self) -> &[String] {
        &self.ordered_columns
    }

    /// Lowercased field name → exported field.
    pub fn export_field_map(&self) -> &HashMap<String, FieldDescriptor> {
        &self.export_fields
    }

    /// Exported fields in declaration order, keyed by lowercased name.
    pub fn ordered_export_fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.export_order
            .iter()
            .filter_map(|name| self.export_fields.get(name).map(|f| (name.as_str(), f)))
    }

    pub fn private_field_map(&self) -> &HashMap<String, FieldDescriptor> {
        &self.private_fields
    }

    /// Case-insensitive column lookup.
    pub fn field_by_column(&self, column: &str) -> Option<&FieldDescriptor> {
        self.columns.get(&column.to_lowercase())
    }

    /// Case-insensitive exported field lookup.
    pub fn export_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.export_fields.get(&name.to_lowercase())
    }

    /// Columns paired with their fields, in declaration order.
    ///
    /// Fails when the column map and the ordered list disagree, which happens
    /// when two fields are tagged with the same column.
    pub fn ordered_fields(&self) -> Result<Vec<(&str, &FieldDescriptor)>> {
        if self.columns.len() != self.ordered_columns.len() {
            return Err(Error::structure(
                "ordered_fields",
                format!(
                    "record `{}` maps {} columns but lists {}; duplicate column tags?",
                    self.type_name,
                    self.columns.len(),
                    self.ordered_columns.len()
                ),
            ));
        }
        self.ordered_columns
            .iter()
            .map(|column| {
                self.columns
                    .get(column)
                    .map(|field| (column.as_str(), field))
                    .ok_or_else(|| {
                        Error::structure(
                            "ordered_fields",
                            format!("column `{}` missing from column map", column),
                        )
                    })
            })
            .collect()
    }
}

/// Write `value` into the field mapped to `column`.
///
/// Returns `Ok(false)` when no field is mapped to the column; execution
/// layers use this to store database-generated keys without caring whether
/// the record persists them.
pub fn assign_column<R: Record>(record: &mut R, column: &str, value: Value) -> Result<bool> {
    let catalog = FieldCatalog::of::<R>()?;
    let Some(field) = catalog.field_by_column(column) else {
        return Ok(false);
    };
    record
        .set_field(field.name, value)
        .map_err(|e| e.with_column(column))
}

/// Read a field by its Rust name.
pub fn field_value<R: Record>(record: &R, field: &str) -> Result<Value> {
    record.get_field(field).ok_or_else(|| {
        Error::mapping(
            "field_value",
            format!("`{}` has no field `{}`", R::record_decl().type_name, field),
        )
    })
}
