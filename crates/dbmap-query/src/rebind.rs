//! Dialect post-processing of generated SQL.
//!
//! Builders emit generic `?` placeholders; the functions here translate them,
//! append pagination, rewrite non-standard UPDATE/DELETE forms and locate
//! clauses for count wrapping.
//!
//! The clause finders are regex heuristics. They find the first match in the
//! raw text, so keywords inside string literals or deeply nested subqueries
//! can be mis-located. A select list whose subquery itself contains
//! parentheses defeats the top-level FROM finder; pass an explicit count
//! query for such statements.

use std::ops::Range;
use std::sync::LazyLock;

use dbmap_core::{Dialect, Error, PaginationStyle, Result, UnsupportedKind, Value};
use regex::Regex;

use crate::page::Page;

static ORDER_BY: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\s(order)\s+by\s"));
static GROUP_BY: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\s(group)\s+by\s"));
static SELECT_FROM: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(^\s*select)(\(.*?\)|[^()]+)*?(from)"));
static UPDATE_TABLE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^\s*update\s+(\w+)\s+set\s"));
static DELETE_TABLE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^\s*delete\s+from\s+(\w+)\s+where\s"));

// Patterns are literals and covered by the tests below.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static SQL pattern must compile")
}

/// Translate `?` placeholders into the dialect's native syntax.
///
/// Text between placeholders is copied unchanged. `?` characters inside
/// string literals are not distinguished from placeholders.
pub fn rebind(dialect: &Dialect, sql: &str) -> String {
    if dialect.uses_native_placeholder() {
        return sql.to_string();
    }
    let mut out = String::with_capacity(sql.len() + 8);
    for (index, part) in sql.split('?').enumerate() {
        if index > 0 {
            out.push_str(&dialect.placeholder(index));
        }
        out.push_str(part);
    }
    out
}

/// Append the dialect's pagination clause and rebind.
pub fn paginate(dialect: &Dialect, sql: &str, page: &Page) -> Result<String> {
    let Some(style) = dialect.pagination_style() else {
        return Err(Error::unsupported(
            "paginate",
            UnsupportedKind::Dialect,
            format!("no pagination syntax for dialect `{}`", dialect),
        ));
    };
    let offset = page.offset()?;
    let size = page.page_size;
    let clause = match style {
        PaginationStyle::LimitComma => format!(" LIMIT {},{}", offset, size),
        PaginationStyle::LimitOffset => format!(" LIMIT {} OFFSET {}", size, offset),
        PaginationStyle::OffsetFetch => {
            format!(" OFFSET {} ROWS FETCH NEXT {} ROWS ONLY", offset, size)
        }
    };
    let mut paged = String::with_capacity(sql.len() + clause.len());
    paged.push_str(sql);
    paged.push_str(&clause);
    Ok(rebind(dialect, &paged))
}

/// Rewrite UPDATE/DELETE for dialects with their own mutation syntax.
///
/// ClickHouse only: `UPDATE t SET ...` becomes `ALTER TABLE t UPDATE ...` and
/// `DELETE FROM t WHERE ...` becomes `ALTER TABLE t DELETE WHERE ...`.
/// Anything else passes through.
pub fn rewrite_mutation(dialect: &Dialect, sql: &str) -> String {
    if *dialect != Dialect::Clickhouse {
        return sql.to_string();
    }
    if let Some(caps) = UPDATE_TABLE.captures(sql) {
        let rest = &sql[caps[0].len()..];
        return format!("ALTER TABLE {} UPDATE {}", &caps[1], rest);
    }
    if let Some(caps) = DELETE_TABLE.captures(sql) {
        let rest = &sql[caps[0].len()..];
        return format!("ALTER TABLE {} DELETE WHERE {}", &caps[1], rest);
    }
    sql.to_string()
}

/// Byte range of the first `ORDER BY`, including the surrounding whitespace.
pub fn find_order_by(sql: &str) -> Option<Range<usize>> {
    ORDER_BY.find(sql).map(|m| m.range())
}

/// Byte range of the first `GROUP BY`, including the surrounding whitespace.
pub fn find_group_by(sql: &str) -> Option<Range<usize>> {
    GROUP_BY.find(sql).map(|m| m.range())
}

/// Byte range of the top-level `FROM` keyword of a SELECT.
///
/// Parenthesized expressions in the select list are skipped, so subqueries
/// before the outer FROM are not mistaken for it.
pub fn find_select_from(sql: &str) -> Option<Range<usize>> {
    let m = SELECT_FROM.find(sql)?;
    Some(m.end() - 4..m.end())
}

/// Quote placeholders bound to text parameters as `'?'` (TDengine only).
///
/// The placeholder count must equal the parameter count.
pub fn quote_text_placeholders(dialect: &Dialect, sql: &str, params: &[Value]) -> Result<String> {
    if *dialect != Dialect::Tdengine {
        return Ok(sql.to_string());
    }
    let parts: Vec<&str> = sql.split('?').collect();
    if parts.len() - 1 != params.len() {
        return Err(Error::mapping(
            "quote_text_placeholders",
            format!(
                "{} placeholders but {} parameters",
                parts.len() - 1,
                params.len()
            ),
        ));
    }
    let mut out = String::with_capacity(sql.len() + params.len() * 2);
    out.push_str(parts[0]);
    for (param, part) in params.iter().zip(&parts[1..]) {
        out.push_str(if param.is_text() { "'?'" } else { "?" });
        out.push_str(part);
    }
    Ok(out)
}

/// Wrap a SELECT into a row-count query.
///
/// Anything from `ORDER BY` on is dropped. DISTINCT, UNION and GROUP BY
/// queries are wrapped as a derived table; others have their select list
/// replaced with `COUNT(*)`.
pub fn wrap_count_sql(sql: &str) -> Result<String> {
    let base = match find_order_by(sql) {
        Some(range) => &sql[..range.start],
        None => sql,
    };
    let lower = base.to_lowercase();
    if lower.contains(" distinct ") || lower.contains(" union ") || find_group_by(base).is_some() {
        return Ok(format!(
            "SELECT COUNT(*) frame_row_count FROM ({}) temp_frame_noob_table_name WHERE 1=1",
            base
        ));
    }
    let Some(from) = find_select_from(base) else {
        return Err(Error::mapping(
            "wrap_count_sql",
            "no top-level FROM clause found; supply an explicit count query",
        ));
    };
    Ok(format!("SELECT COUNT(*) {}", &base[from.start..]))
}
