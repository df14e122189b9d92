//! Builder configuration.

use dbmap_core::Dialect;
use serde::{Deserialize, Serialize};

/// Settings for a [`SqlBuilder`](crate::SqlBuilder).
///
/// Loading is left to the application; this type only deserializes.
///
/// ```
/// use dbmap_query::BuilderConfig;
///
/// let config: BuilderConfig = serde_json::from_str(r#"{"dialect":"postgres"}"#).unwrap();
/// assert_eq!(config.dialect.name(), "postgresql");
/// assert!(!config.print_sql);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub dialect: Dialect,
    /// Log generated SQL at `info` instead of `trace`
    pub print_sql: bool,
}

impl BuilderConfig {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            print_sql: false,
        }
    }

    pub fn print_sql(mut self, print_sql: bool) -> Self {
        self.print_sql = print_sql;
        self
    }
}
