//! Statement builders for records and key/value maps.
//!
//! Every builder walks the record's cached column list once, in declaration
//! order, deciding per column whether it is bound, replaced by a sequence
//! literal, or dropped. Output SQL is rebound for the configured dialect
//! before it is returned; `insert_parts` is the one exception, since its
//! fragments are meant to be reassembled.

use dbmap_core::{
    Dialect, Entity, EntityMap, Error, FieldCatalog, FieldDescriptor, PkKind, PkStrategy,
    PrimaryKeyPlan, Result, UnsupportedKind, Value, generate_string_id, resolve_pk_field,
};

use crate::config::BuilderConfig;
use crate::context::QueryContext;
use crate::page::Page;
use crate::rebind::{paginate, quote_text_placeholders, rebind, rewrite_mutation, wrap_count_sql};

/// Final SQL text and positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    /// Insert the context's hint after the first keyword.
    pub fn with_context(mut self, ctx: &QueryContext) -> Self {
        self.sql = ctx.apply_hint(&self.sql);
        self
    }
}

/// An INSERT plus what the execution layer needs to read back a key.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub sql: String,
    pub params: Vec<Value>,
    /// Resolved primary key, when the record maps one
    pub pk: Option<PrimaryKeyPlan>,
    /// The database assigns the key (auto-increment, sequence or trigger)
    pub database_key: bool,
}

impl InsertStatement {
    pub fn with_context(mut self, ctx: &QueryContext) -> Self {
        self.sql = ctx.apply_hint(&self.sql);
        self
    }
}

/// Unbound INSERT fragments of a single record.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertParts {
    pub table: String,
    /// `INSERT INTO table(col,...)`
    pub insert: String,
    /// `(?,...)`, with sequence literals in place of placeholders
    pub values: String,
    pub params: Vec<Value>,
    pub pk: Option<PrimaryKeyPlan>,
    sources: Vec<ValueSource>,
}

/// Where each entry of the VALUES tuple comes from.
#[derive(Debug, Clone, PartialEq)]
enum ValueSource {
    Field {
        name: &'static str,
        /// Empty text key, regenerated per record
        text_key: bool,
    },
    Literal,
}

/// Builds dialect-correct statements.
///
/// # Example
///
/// ```
/// use dbmap_core::{Dialect, EntityMap};
/// use dbmap_query::SqlBuilder;
///
/// let mut row = EntityMap::new("t_user", "id");
/// row.set("id", 7_i64);
/// row.set("name", "x");
///
/// let stmt = SqlBuilder::new(Dialect::Postgresql).update_map(&row).unwrap();
/// assert_eq!(stmt.sql, "UPDATE t_user SET name=$1 WHERE id=$2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlBuilder {
    dialect: Dialect,
    print_sql: bool,
}

impl SqlBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            print_sql: false,
        }
    }

    pub fn from_config(config: &BuilderConfig) -> Self {
        Self {
            dialect: config.dialect.clone(),
            print_sql: config.print_sql,
        }
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Single-record INSERT.
    ///
    /// An empty text key is replaced by a generated ID, written back into
    /// `entity` before the statement is returned.
    pub fn insert<E: Entity>(&self, entity: &mut E) -> Result<InsertStatement> {
        let parts = self.insert_parts(entity)?;
        let sql = format!("{} VALUES {}", parts.insert, parts.values);
        let stmt = self.finish("insert", &parts.table, sql, parts.params)?;
        let database_key = parts.pk.as_ref().is_some_and(|pk| pk.strategy != PkStrategy::Assigned);
        Ok(InsertStatement {
            sql: stmt.sql,
            params: stmt.params,
            pk: parts.pk,
            database_key,
        })
    }

    /// INSERT fragments for one record, not rebound.
    pub fn insert_parts<E: Entity>(&self, entity: &mut E) -> Result<InsertParts> {
        let catalog = FieldCatalog::of::<E>()?;
        let fields = catalog.ordered_fields()?;
        let pk_field = resolve_pk_field(&catalog, entity.pk_column_name());
        let pk_kind = pk_field.map(PkKind::classify).transpose()?;
        let sequences = entity.pk_sequence();
        let registered = PkStrategy::from_sequence(sequences.as_ref(), &self.dialect);

        let mut columns = Vec::with_capacity(fields.len());
        let mut placeholders = Vec::with_capacity(fields.len());
        let mut params = Vec::with_capacity(fields.len());
        let mut sources = Vec::with_capacity(fields.len());
        let mut pk_plan = None;

        for (column, field) in fields {
            let ident = self.column_ident(field.column.unwrap_or(column));
            let is_pk = pk_field.is_some_and(|pk| pk.name == field.name);
            if !is_pk {
                params.push(read_field(entity, field)?);
                columns.push(ident);
                placeholders.push("?".to_string());
                sources.push(ValueSource::Field {
                    name: field.name,
                    text_key: false,
                });
                continue;
            }

            let Some(kind) = pk_kind else {
                continue;
            };
            let mut plan = PrimaryKeyPlan {
                field: field.name,
                column: column.to_string(),
                kind,
                strategy: PkStrategy::Assigned,
            };
            match &registered {
                Some(PkStrategy::Trigger) => {
                    plan.strategy = PkStrategy::Trigger;
                }
                Some(PkStrategy::Sequence(expr)) => {
                    columns.push(ident);
                    placeholders.push(expr.clone());
                    sources.push(ValueSource::Literal);
                    plan.strategy = PkStrategy::Sequence(expr.clone());
                }
                _ => {
                    let value = read_field(entity, field)?;
                    if !value.is_zero() {
                        params.push(value);
                    } else if kind == PkKind::Text {
                        params.push(assign_generated_key(entity, field.name)?);
                    } else {
                        plan.strategy = PkStrategy::AutoIncrement;
                    }
                    if plan.strategy == PkStrategy::Assigned {
                        columns.push(ident);
                        placeholders.push("?".to_string());
                        sources.push(ValueSource::Field {
                            name: field.name,
                            text_key: kind == PkKind::Text,
                        });
                    }
                }
            }
            tracing::trace!(
                record = catalog.type_name(),
                column = %plan.column,
                strategy = ?plan.strategy,
                "Resolved primary key"
            );
            pk_plan = Some(plan);
        }

        if columns.is_empty() {
            return Err(Error::unsupported(
                "insert",
                UnsupportedKind::EmptyInput,
                format!("record `{}` has no columns to insert", catalog.type_name()),
            ));
        }

        let table = entity.table_name().to_string();
        Ok(InsertParts {
            insert: format!("INSERT INTO {}({})", table, columns.join(",")),
            values: format!("({})", placeholders.join(",")),
            table,
            params,
            pk: pk_plan,
            sources,
        })
    }

    /// Multi-row INSERT built from the first record's column layout.
    ///
    /// TDengine repeats the table name per record
    /// (`INSERT INTO t1 VALUES (..) t2 VALUES (..)`); other dialects append
    /// `, (..)` tuples.
    pub fn insert_batch<E: Entity>(&self, entities: &mut [E]) -> Result<InsertStatement> {
        let Some((first, rest)) = entities.split_first_mut() else {
            return Err(Error::unsupported(
                "insert_batch",
                UnsupportedKind::EmptyInput,
                "batch is empty",
            ));
        };
        let parts = self.insert_parts(first)?;
        let multi_table = self.dialect.is_multi_table_insert();

        let mut sql = if multi_table {
            format!("INSERT INTO {} VALUES {}", parts.table, parts.values)
        } else {
            format!("{} VALUES {}", parts.insert, parts.values)
        };
        let mut params = parts.params;
        params.reserve(parts.sources.len() * rest.len());

        for entity in rest {
            if multi_table {
                sql.push(' ');
                sql.push_str(entity.table_name());
                sql.push_str(" VALUES ");
            } else {
                sql.push_str(", ");
            }
            sql.push_str(&parts.values);

            for source in &parts.sources {
                let ValueSource::Field { name, text_key } = *source else {
                    continue;
                };
                let value = entity.get_field(name).ok_or_else(|| missing_field(name))?;
                if text_key && value.is_zero() {
                    params.push(assign_generated_key(entity, name)?);
                } else {
                    params.push(value);
                }
            }
        }

        let stmt = self.finish("insert_batch", &parts.table, sql, params)?;
        let database_key = parts.pk.as_ref().is_some_and(|pk| pk.strategy != PkStrategy::Assigned);
        Ok(InsertStatement {
            sql: stmt.sql,
            params: stmt.params,
            pk: parts.pk,
            database_key,
        })
    }

    /// UPDATE by primary key. With `only_non_zero`, columns holding their
    /// type's zero value are left out of the SET list.
    pub fn update<E: Entity>(&self, entity: &E, only_non_zero: bool) -> Result<Statement> {
        let catalog = FieldCatalog::of::<E>()?;
        let fields = catalog.ordered_fields()?;
        let pk_field = mapped_pk(&catalog, entity, "update")?;

        let mut sets = Vec::with_capacity(fields.len());
        let mut params = Vec::with_capacity(fields.len() + 1);
        let mut pk_value = Value::Null;
        for (column, field) in fields {
            let value = read_field(entity, field)?;
            if field.name == pk_field.name {
                pk_value = value;
                continue;
            }
            if only_non_zero && value.is_zero() {
                continue;
            }
            sets.push(format!("{}=?", self.column_ident(field.column.unwrap_or(column))));
            params.push(value);
        }
        if sets.is_empty() {
            return Err(Error::unsupported(
                "update",
                UnsupportedKind::EmptyInput,
                format!("record `{}` has no columns to update", catalog.type_name()),
            ));
        }
        params.push(pk_value);

        let sql = format!(
            "UPDATE {} SET {} WHERE {}=?",
            entity.table_name(),
            sets.join(","),
            entity.pk_column_name()
        );
        let sql = rewrite_mutation(&self.dialect, &sql);
        self.finish("update", entity.table_name(), sql, params)
    }

    /// DELETE by primary key.
    pub fn delete<E: Entity>(&self, entity: &E) -> Result<Statement> {
        let catalog = FieldCatalog::of::<E>()?;
        let pk_field = mapped_pk(&catalog, entity, "delete")?;
        let pk_value = read_field(entity, pk_field)?;

        let sql = format!(
            "DELETE FROM {} WHERE {}=?",
            entity.table_name(),
            entity.pk_column_name()
        );
        let sql = rewrite_mutation(&self.dialect, &sql);
        self.finish("delete", entity.table_name(), sql, vec![pk_value])
    }

    /// INSERT of a key/value map.
    ///
    /// When the key column is absent and the dialect has a non-empty sequence
    /// registered, the sequence expression is inserted for it. An absent key
    /// is otherwise left to the database.
    pub fn insert_map(&self, entity: &EntityMap) -> Result<InsertStatement> {
        if entity.is_empty() {
            return Err(Error::unsupported(
                "insert_map",
                UnsupportedKind::EmptyInput,
                format!("no values to insert into `{}`", entity.table_name()),
            ));
        }
        let mut columns = Vec::with_capacity(entity.len() + 1);
        let mut placeholders = Vec::with_capacity(entity.len() + 1);
        let mut params = Vec::with_capacity(entity.len());

        let pk = entity.pk_column_name();
        let database_key = !pk.is_empty() && !entity.has(pk);
        if database_key {
            if let Some(expr) = entity
                .pk_sequence()
                .get(self.dialect.name())
                .filter(|expr| !expr.is_empty())
            {
                columns.push(pk.to_string());
                placeholders.push(expr.clone());
            }
        }
        for (column, value) in entity.iter() {
            columns.push(column.to_string());
            placeholders.push("?".to_string());
            params.push(value.clone());
        }

        let sql = format!(
            "INSERT INTO {}({}) VALUES ({})",
            entity.table_name(),
            columns.join(","),
            placeholders.join(",")
        );
        let stmt = self.finish("insert_map", entity.table_name(), sql, params)?;
        Ok(InsertStatement {
            sql: stmt.sql,
            params: stmt.params,
            pk: None,
            database_key,
        })
    }

    /// UPDATE of a key/value map; the key column's value goes in the WHERE
    /// clause.
    pub fn update_map(&self, entity: &EntityMap) -> Result<Statement> {
        if entity.is_empty() {
            return Err(Error::unsupported(
                "update_map",
                UnsupportedKind::EmptyInput,
                format!("no values to update in `{}`", entity.table_name()),
            ));
        }
        let pk = entity.pk_column_name();
        let Some(pk_value) = entity.pk_value() else {
            return Err(Error::mapping(
                "update_map",
                format!(
                    "primary key `{}` of `{}` has no value",
                    pk,
                    entity.table_name()
                ),
            ));
        };

        let mut sets = Vec::with_capacity(entity.len());
        let mut params = Vec::with_capacity(entity.len());
        for (column, value) in entity.iter().filter(|(column, _)| *column != pk) {
            sets.push(format!("{}=?", column));
            params.push(value.clone());
        }
        if sets.is_empty() {
            return Err(Error::unsupported(
                "update_map",
                UnsupportedKind::EmptyInput,
                format!("only the primary key of `{}` was given", entity.table_name()),
            ));
        }
        params.push(pk_value.clone());

        let sql = format!(
            "UPDATE {} SET {} WHERE {}=?",
            entity.table_name(),
            sets.join(","),
            pk
        );
        let sql = rewrite_mutation(&self.dialect, &sql);
        self.finish("update_map", entity.table_name(), sql, params)
    }

    /// Caller-written SELECT, rebound and optionally paginated.
    pub fn select(&self, sql: &str, params: Vec<Value>, page: Option<&Page>) -> Result<Statement> {
        let Some(page) = page else {
            return self.finish("select", "", sql.to_string(), params);
        };
        page.validate()?;
        let paged = paginate(&self.dialect, sql, page)?;
        let sql = quote_text_placeholders(&self.dialect, &paged, &params)?;
        self.log("select", "", &sql, params.len());
        Ok(Statement { sql, params })
    }

    /// Row count of a caller-written SELECT.
    pub fn count(&self, sql: &str, params: Vec<Value>) -> Result<Statement> {
        let count_sql = wrap_count_sql(sql)?;
        self.finish("count", "", count_sql, params)
    }

    fn column_ident(&self, column: &str) -> String {
        if self.dialect.quotes_upper_identifiers() {
            format!("\"{}\"", column.replace('"', "").to_uppercase())
        } else {
            column.to_string()
        }
    }

    fn finish(
        &self,
        op: &'static str,
        table: &str,
        sql: String,
        params: Vec<Value>,
    ) -> Result<Statement> {
        let sql = quote_text_placeholders(&self.dialect, &sql, &params)?;
        let sql = rebind(&self.dialect, &sql);
        self.log(op, table, &sql, params.len());
        Ok(Statement { sql, params })
    }

    fn log(&self, op: &'static str, table: &str, sql: &str, params: usize) {
        tracing::debug!(
            dialect = %self.dialect,
            op = op,
            table = table,
            params = params,
            "Built statement"
        );
        if self.print_sql {
            tracing::info!(dialect = %self.dialect, sql = sql, "SQL");
        } else {
            tracing::trace!(dialect = %self.dialect, sql = sql, "SQL");
        }
    }
}

fn read_field<E: Entity>(entity: &E, field: &FieldDescriptor) -> Result<Value> {
    entity.get_field(field.name).ok_or_else(|| missing_field(field.name))
}

fn missing_field(name: &str) -> Error {
    Error::structure(
        "read_field",
        format!("declared field `{}` is not readable", name),
    )
}

/// Generate a text key and write it back into `field`.
fn assign_generated_key<E: Entity>(entity: &mut E, field: &str) -> Result<Value> {
    let id = generate_string_id()?;
    if !entity.set_field(field, Value::Text(id.clone()))? {
        return Err(Error::mapping(
            "assign_generated_key",
            format!("field `{}` did not accept the generated key", field),
        ));
    }
    tracing::debug!(field, "Assigned generated primary key");
    Ok(Value::Text(id))
}

fn mapped_pk<'a, E: Entity>(
    catalog: &'a FieldCatalog,
    entity: &E,
    op: &'static str,
) -> Result<&'a FieldDescriptor> {
    resolve_pk_field(catalog, entity.pk_column_name()).ok_or_else(|| {
        Error::mapping(
            op,
            format!(
                "primary key column `{}` is not mapped by `{}`",
                entity.pk_column_name(),
                catalog.type_name()
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbmap_core::{FieldDecl, FieldKind, FieldType, Record, RecordDecl};
    use std::collections::HashMap;

    // Hand-written records; the derive lives in a crate that depends on this one.
    #[derive(Debug, Default, Clone)]
    struct Account {
        id: i64,
        name: String,
        age: i32,
    }

    static ACCOUNT_DECL: RecordDecl = RecordDecl {
        type_name: "builder::Account",
        fields: &[
            FieldDecl::new("id", FieldKind::Int64).column("id"),
            FieldDecl::new("name", FieldKind::Text).column("name"),
            FieldDecl::new("age", FieldKind::Int32).column("age"),
        ],
    };

    impl Record for Account {
        fn record_decl() -> &'static RecordDecl {
            &ACCOUNT_DECL
        }

        fn get_field(&self, name: &str) -> Option<Value> {
            match name {
                "id" => Some(self.id.to_value()),
                "name" => Some(self.name.to_value()),
                "age" => Some(self.age.to_value()),
                _ => None,
            }
        }

        fn set_field(&mut self, name: &str, value: Value) -> Result<bool> {
            match name {
                "id" => self.id = FieldType::from_value(value)?,
                "name" => self.name = FieldType::from_value(value)?,
                "age" => self.age = FieldType::from_value(value)?,
                _ => return Ok(false),
            }
            Ok(true)
        }
    }

    impl Entity for Account {
        fn table_name(&self) -> &str {
            "t"
        }

        fn pk_column_name(&self) -> &str {
            "id"
        }
    }

    #[derive(Debug, Default, Clone)]
    struct Ticket {
        code: String,
        title: String,
    }

    static TICKET_DECL: RecordDecl = RecordDecl {
        type_name: "builder::Ticket",
        fields: &[
            FieldDecl::new("code", FieldKind::Text).column("code"),
            FieldDecl::new("title", FieldKind::Text).column("title"),
        ],
    };

    impl Record for Ticket {
        fn record_decl() -> &'static RecordDecl {
            &TICKET_DECL
        }

        fn get_field(&self, name: &str) -> Option<Value> {
            match name {
                "code" => Some(self.code.to_value()),
                "title" => Some(self.title.to_value()),
                _ => None,
            }
        }

        fn set_field(&mut self, name: &str, value: Value) -> Result<bool> {
            match name {
                "code" => self.code = FieldType::from_value(value)?,
                "title" => self.title = FieldType::from_value(value)?,
                _ => return Ok(false),
            }
            Ok(true)
        }
    }

    impl Entity for Ticket {
        fn table_name(&self) -> &str {
            "ticket"
        }

        fn pk_column_name(&self) -> &str {
            "\"code\""
        }

        fn pk_sequence(&self) -> Option<HashMap<String, String>> {
            Some(HashMap::from([
                ("oracle".to_string(), "SEQ_TICKET.nextval".to_string()),
                ("postgresql".to_string(), String::new()),
            ]))
        }
    }

    /// Text-keyed record that refuses writes.
    #[derive(Debug, Default, Clone)]
    struct Frozen {
        code: String,
    }

    static FROZEN_DECL: RecordDecl = RecordDecl {
        type_name: "builder::Frozen",
        fields: &[FieldDecl::new("code", FieldKind::Text).column("code")],
    };

    impl Record for Frozen {
        fn record_decl() -> &'static RecordDecl {
            &FROZEN_DECL
        }

        fn get_field(&self, name: &str) -> Option<Value> {
            (name == "code").then(|| self.code.to_value())
        }

        fn set_field(&mut self, _name: &str, _value: Value) -> Result<bool> {
            Ok(false)
        }
    }

    impl Entity for Frozen {
        fn table_name(&self) -> &str {
            "frozen"
        }

        fn pk_column_name(&self) -> &str {
            "code"
        }
    }

    fn account(id: i64, name: &str, age: i32) -> Account {
        Account {
            id,
            name: name.to_string(),
            age,
        }
    }

    #[test]
    fn test_update_skips_zero_values() {
        let stmt = SqlBuilder::new(Dialect::Mysql)
            .update(&account(7, "x", 0), true)
            .unwrap();
        assert_eq!(stmt.sql, "UPDATE t SET name=? WHERE id=?");
        assert_eq!(stmt.params, vec![Value::Text("x".to_string()), Value::BigInt(7)]);
    }

    #[test]
    fn test_update_all_columns() {
        let stmt = SqlBuilder::new(Dialect::Postgresql)
            .update(&account(7, "x", 0), false)
            .unwrap();
        assert_eq!(stmt.sql, "UPDATE t SET name=$1,age=$2 WHERE id=$3");
        assert_eq!(stmt.params.len(), 3);
    }

    #[test]
    fn test_update_with_nothing_to_set() {
        let err = SqlBuilder::new(Dialect::Mysql)
            .update(&account(7, "", 0), true)
            .unwrap_err();
        assert_eq!(err.unsupported_kind(), Some(UnsupportedKind::EmptyInput));
    }

    #[test]
    fn test_zero_numeric_key_is_left_to_database() {
        let mut record = account(0, "a", 3);
        let stmt = SqlBuilder::new(Dialect::Mysql).insert(&mut record).unwrap();
        assert_eq!(stmt.sql, "INSERT INTO t(name,age) VALUES (?,?)");
        assert_eq!(stmt.params, vec![Value::Text("a".to_string()), Value::Int(3)]);
        assert!(stmt.database_key);
        assert_eq!(stmt.pk.unwrap().strategy, PkStrategy::AutoIncrement);
    }

    #[test]
    fn test_non_zero_numeric_key_is_bound() {
        let mut record = account(5, "a", 3);
        let stmt = SqlBuilder::new(Dialect::Oracle).insert(&mut record).unwrap();
        assert_eq!(stmt.sql, "INSERT INTO t(id,name,age) VALUES (:1,:2,:3)");
        assert_eq!(stmt.params[0], Value::BigInt(5));
        assert!(!stmt.database_key);
    }

    #[test]
    fn test_empty_text_key_is_generated_and_written_back() {
        let mut ticket = Ticket {
            code: String::new(),
            title: "t".to_string(),
        };
        let stmt = SqlBuilder::new(Dialect::Mysql).insert(&mut ticket).unwrap();
        assert_eq!(stmt.sql, "INSERT INTO ticket(code,title) VALUES (?,?)");
        assert!(!ticket.code.is_empty());
        assert_eq!(stmt.params[0], Value::Text(ticket.code.clone()));
    }

    #[test]
    fn test_present_text_key_is_untouched() {
        let mut ticket = Ticket {
            code: "T-1".to_string(),
            title: "t".to_string(),
        };
        SqlBuilder::new(Dialect::Mysql).insert(&mut ticket).unwrap();
        assert_eq!(ticket.code, "T-1");
    }

    #[test]
    fn test_sequence_and_trigger_keys() {
        let mut ticket = Ticket::default();
        let stmt = SqlBuilder::new(Dialect::Oracle).insert(&mut ticket).unwrap();
        assert_eq!(
            stmt.sql,
            "INSERT INTO ticket(code,title) VALUES (SEQ_TICKET.nextval,:1)"
        );
        assert_eq!(stmt.params.len(), 1);
        assert!(ticket.code.is_empty());

        let stmt = SqlBuilder::new(Dialect::Postgresql)
            .insert(&mut ticket)
            .unwrap();
        assert_eq!(stmt.sql, "INSERT INTO ticket(title) VALUES ($1)");
        assert_eq!(stmt.pk.unwrap().strategy, PkStrategy::Trigger);
    }

    #[test]
    fn test_kingbase_quotes_columns() {
        let mut record = account(1, "a", 2);
        let stmt = SqlBuilder::new(Dialect::Kingbase)
            .insert(&mut record)
            .unwrap();
        assert_eq!(
            stmt.sql,
            "INSERT INTO t(\"ID\",\"NAME\",\"AGE\") VALUES ($1,$2,$3)"
        );
    }

    #[test]
    fn test_insert_parts_are_not_rebound() {
        let mut record = account(1, "a", 2);
        let parts = SqlBuilder::new(Dialect::Postgresql)
            .insert_parts(&mut record)
            .unwrap();
        assert_eq!(parts.insert, "INSERT INTO t(id,name,age)");
        assert_eq!(parts.values, "(?,?,?)");
        assert_eq!(parts.table, "t");
    }

    #[test]
    fn test_batch_standard_shape() {
        let mut records = vec![account(0, "a", 1), account(0, "b", 2), account(0, "c", 3)];
        let stmt = SqlBuilder::new(Dialect::Mysql)
            .insert_batch(&mut records)
            .unwrap();
        assert_eq!(
            stmt.sql,
            "INSERT INTO t(name,age) VALUES (?,?), (?,?), (?,?)"
        );
        assert_eq!(stmt.sql.matches("INSERT").count(), 1);
        assert_eq!(stmt.params.len(), 6);
        assert_eq!(stmt.params[4], Value::Text("c".to_string()));
    }

    #[test]
    fn test_batch_multi_table_shape() {
        let mut tickets = vec![
            Ticket { code: "a".to_string(), title: "x".to_string() },
            Ticket::default(),
            Ticket { code: "c".to_string(), title: "z".to_string() },
        ];
        let stmt = SqlBuilder::new(Dialect::Tdengine)
            .insert_batch(&mut tickets)
            .unwrap();
        assert_eq!(
            stmt.sql,
            "INSERT INTO ticket VALUES ('?','?') ticket VALUES ('?','?') ticket VALUES ('?','?')"
        );
        assert_eq!(stmt.params.len(), 6);
        assert!(!tickets[1].code.is_empty());
        assert_eq!(stmt.params[2], Value::Text(tickets[1].code.clone()));
    }

    #[test]
    fn test_empty_batch_fails() {
        let mut records: Vec<Account> = Vec::new();
        let err = SqlBuilder::new(Dialect::Mysql)
            .insert_batch(&mut records)
            .unwrap_err();
        assert_eq!(err.unsupported_kind(), Some(UnsupportedKind::EmptyInput));
    }

    #[test]
    fn test_delete_and_clickhouse_rewrite() {
        let record = account(9, "a", 1);
        let stmt = SqlBuilder::new(Dialect::Mssql).delete(&record).unwrap();
        assert_eq!(stmt.sql, "DELETE FROM t WHERE id=@p1");
        assert_eq!(stmt.params, vec![Value::BigInt(9)]);

        let stmt = SqlBuilder::new(Dialect::Clickhouse).delete(&record).unwrap();
        assert_eq!(stmt.sql, "ALTER TABLE t DELETE WHERE id=?");

        let stmt = SqlBuilder::new(Dialect::Clickhouse)
            .update(&record, false)
            .unwrap();
        assert_eq!(stmt.sql, "ALTER TABLE t UPDATE name=?,age=? WHERE id=?");
    }

    #[test]
    fn test_insert_map_with_sequence() {
        let mut row = EntityMap::new("t_log", "id").with_sequence("oracle", "SEQ_LOG.nextval");
        row.set("msg", "hello");
        let stmt = SqlBuilder::new(Dialect::Oracle).insert_map(&row).unwrap();
        assert_eq!(stmt.sql, "INSERT INTO t_log(id,msg) VALUES (SEQ_LOG.nextval,:1)");
        assert!(stmt.database_key);

        let stmt = SqlBuilder::new(Dialect::Mysql).insert_map(&row).unwrap();
        assert_eq!(stmt.sql, "INSERT INTO t_log(msg) VALUES (?)");
    }

    #[test]
    fn test_map_errors() {
        let builder = SqlBuilder::new(Dialect::Mysql);
        let empty = EntityMap::new("t", "id");
        assert!(builder.insert_map(&empty).is_err());
        assert!(builder.update_map(&empty).is_err());

        let mut no_pk = EntityMap::new("t", "id");
        no_pk.set("a", 1_i32);
        assert!(matches!(
            builder.update_map(&no_pk).unwrap_err(),
            Error::Mapping { .. }
        ));
    }

    #[test]
    fn test_select_and_count() {
        let builder = SqlBuilder::new(Dialect::Postgresql);
        let page = Page::new(2, 20).unwrap();
        let stmt = builder
            .select(
                "SELECT * FROM t WHERE a=? ORDER BY id",
                vec![Value::Int(1)],
                Some(&page),
            )
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM t WHERE a=$1 ORDER BY id LIMIT 20 OFFSET 20"
        );

        let count = builder
            .count("SELECT * FROM t WHERE a=? ORDER BY id", vec![Value::Int(1)])
            .unwrap();
        assert_eq!(count.sql, "SELECT COUNT(*) FROM t WHERE a=$1");
    }

    #[test]
    fn test_hint_from_context() {
        let ctx = QueryContext::new().with_hint("/*+ INDEX(t pk_t) */");
        let stmt = SqlBuilder::new(Dialect::Oracle)
            .delete(&account(1, "", 0))
            .unwrap()
            .with_context(&ctx);
        assert_eq!(stmt.sql, "DELETE /*+ INDEX(t pk_t) */ FROM t WHERE id=:1");
    }

    #[test]
    fn test_unwritable_generated_key_is_mapping_error() {
        let mut single = Frozen::default();
        let err = SqlBuilder::new(Dialect::Mysql).insert(&mut single).unwrap_err();
        assert!(matches!(err, Error::Mapping { op: "assign_generated_key", .. }));

        let mut batch = vec![
            Frozen {
                code: "F-1".to_string(),
            },
            Frozen::default(),
        ];
        let err = SqlBuilder::new(Dialect::Mysql)
            .insert_batch(&mut batch)
            .unwrap_err();
        assert!(matches!(err, Error::Mapping { op: "assign_generated_key", .. }));
        assert!(err.to_string().contains("`code`"));
    }
}
