//! SQL dialect profiles.
//!
//! A dialect decides placeholder syntax, pagination syntax and whether
//! UPDATE/DELETE must be rewritten. Names outside the recognized set are kept
//! as [`Dialect::Other`]; they bind with `?` and cannot paginate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, UnsupportedKind};

/// A SQL vendor syntax profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dialect {
    #[default]
    Mysql,
    Postgresql,
    Mssql,
    Oracle,
    Sqlite,
    Clickhouse,
    Tdengine,
    Kingbase,
    Shentong,
    Dm,
    Gbase,
    /// Unrecognized, lowercased dialect name
    Other(String),
}

/// Placeholder syntax used after rebinding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?`, left untouched
    Question,
    /// `$1, $2, ...`
    Dollar,
    /// `@p1, @p2, ...`
    AtP,
    /// `:1, :2, ...`
    Colon,
}

/// Pagination clause family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStyle {
    /// `LIMIT offset,count`
    LimitComma,
    /// `LIMIT count OFFSET offset`
    LimitOffset,
    /// `OFFSET offset ROWS FETCH NEXT count ROWS ONLY`
    OffsetFetch,
}

impl Dialect {
    /// Canonical lowercase name.
    pub fn name(&self) -> &str {
        match self {
            Dialect::Mysql => "mysql",
            Dialect::Postgresql => "postgresql",
            Dialect::Mssql => "mssql",
            Dialect::Oracle => "oracle",
            Dialect::Sqlite => "sqlite",
            Dialect::Clickhouse => "clickhouse",
            Dialect::Tdengine => "tdengine",
            Dialect::Kingbase => "kingbase",
            Dialect::Shentong => "shentong",
            Dialect::Dm => "dm",
            Dialect::Gbase => "gbase",
            Dialect::Other(name) => name,
        }
    }

    pub fn placeholder_style(&self) -> PlaceholderStyle {
        match self {
            Dialect::Postgresql | Dialect::Kingbase => PlaceholderStyle::Dollar,
            Dialect::Mssql => PlaceholderStyle::AtP,
            Dialect::Oracle | Dialect::Shentong => PlaceholderStyle::Colon,
            _ => PlaceholderStyle::Question,
        }
    }

    /// Whether `?` is already the native placeholder.
    pub fn uses_native_placeholder(&self) -> bool {
        self.placeholder_style() == PlaceholderStyle::Question
    }

    /// The `index`-th (1-based) placeholder token.
    pub fn placeholder(&self, index: usize) -> String {
        match self.placeholder_style() {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Dollar => format!("${}", index),
            PlaceholderStyle::AtP => format!("@p{}", index),
            PlaceholderStyle::Colon => format!(":{}", index),
        }
    }

    /// Pagination family, `None` for dialects that cannot paginate.
    pub fn pagination_style(&self) -> Option<PaginationStyle> {
        match self {
            Dialect::Mysql
            | Dialect::Sqlite
            | Dialect::Dm
            | Dialect::Gbase
            | Dialect::Clickhouse
            | Dialect::Tdengine => Some(PaginationStyle::LimitComma),
            Dialect::Postgresql | Dialect::Kingbase | Dialect::Shentong => {
                Some(PaginationStyle::LimitOffset)
            }
            Dialect::Mssql | Dialect::Oracle => Some(PaginationStyle::OffsetFetch),
            Dialect::Other(_) => None,
        }
    }

    /// TDengine inserts name the target table once per VALUES clause.
    pub fn is_multi_table_insert(&self) -> bool {
        matches!(self, Dialect::Tdengine)
    }

    /// Column identifiers must be upper-cased and double-quoted.
    pub fn quotes_upper_identifiers(&self) -> bool {
        matches!(self, Dialect::Kingbase)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let dialect = match name.as_str() {
            "" => {
                return Err(Error::unsupported(
                    "parse_dialect",
                    UnsupportedKind::Dialect,
                    "dialect name is empty",
                ));
            }
            "mysql" | "mariadb" => Dialect::Mysql,
            "postgresql" | "postgres" | "pg" => Dialect::Postgresql,
            "mssql" | "sqlserver" => Dialect::Mssql,
            "oracle" => Dialect::Oracle,
            "sqlite" | "sqlite3" => Dialect::Sqlite,
            "clickhouse" => Dialect::Clickhouse,
            "tdengine" => Dialect::Tdengine,
            "kingbase" => Dialect::Kingbase,
            "shentong" => Dialect::Shentong,
            "dm" => Dialect::Dm,
            "gbase" => Dialect::Gbase,
            _ => Dialect::Other(name),
        };
        Ok(dialect)
    }
}

impl TryFrom<String> for Dialect {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dialect> for String {
    fn from(dialect: Dialect) -> Self {
        dialect.name().to_string()
    }
}
