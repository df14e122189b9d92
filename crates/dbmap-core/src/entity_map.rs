//! Untyped key/value records.
//!
//! `EntityMap` carries a table name, its primary key column and an ordered
//! column → value map for payloads that have no Rust type. The caller is
//! responsible for supplying a complete column set; nothing is classified or
//! generated for map payloads beyond the sequence lookup.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::value::Value;

/// A dynamic row bound to a table.
///
/// # Example
///
/// ```
/// use dbmap_core::entity_map::EntityMap;
/// use dbmap_core::value::Value;
///
/// let mut row = EntityMap::new("t_user", "id");
/// row.set("name", "alice");
/// row.set("age", 30_i32);
/// assert_eq!(row.get("name"), Some(&Value::Text("alice".to_string())));
/// assert_eq!(row.columns().collect::<Vec<_>>(), ["name", "age"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityMap {
    table_name: String,
    pk_column: String,
    values: IndexMap<String, Value>,
    pk_sequence: HashMap<String, String>,
}

impl EntityMap {
    pub fn new(table_name: impl Into<String>, pk_column: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            pk_column: pk_column.into(),
            values: IndexMap::new(),
            pk_sequence: HashMap::new(),
        }
    }

    /// Register the key's sequence expression for a dialect. An empty
    /// expression marks the key as trigger-filled.
    pub fn with_sequence(mut self, dialect: impl Into<String>, expr: impl Into<String>) -> Self {
        self.pk_sequence
            .insert(dialect.into().to_ascii_lowercase(), expr.into());
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn pk_column_name(&self) -> &str {
        &self.pk_column
    }

    pub fn pk_sequence(&self) -> &HashMap<String, String> {
        &self.pk_sequence
    }

    /// Set a column value, keeping the column's first insertion position.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.values.shift_remove(column)
    }

    pub fn has(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Column/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the primary key column, if present.
    pub fn pk_value(&self) -> Option<&Value> {
        if self.pk_column.is_empty() {
            return None;
        }
        self.values.get(&self.pk_column)
    }
}
