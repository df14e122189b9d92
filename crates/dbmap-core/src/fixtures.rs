//! Hand-written records shared by the unit tests.

use std::collections::HashMap;

use crate::error::Result;
use crate::record::{Entity, FieldDecl, FieldKind, Record, RecordDecl};
use crate::value::{FieldType, Value};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Audit {
    pub created_by: String,
    /// Shadowed by `User::id`
    pub id: i64,
}

static AUDIT_DECL: RecordDecl = RecordDecl {
    type_name: "fixtures::Audit",
    fields: &[
        FieldDecl::new("created_by", FieldKind::Text).column("created_by"),
        FieldDecl::new("id", FieldKind::Int64).column("audit_id"),
    ],
};

fn audit_decl() -> &'static RecordDecl {
    &AUDIT_DECL
}

impl Record for Audit {
    fn record_decl() -> &'static RecordDecl {
        &AUDIT_DECL
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "created_by" => Some(self.created_by.to_value()),
            "id" => Some(self.id.to_value()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<bool> {
        match name {
            "created_by" => self.created_by = FieldType::from_value(value)?,
            "id" => self.id = FieldType::from_value(value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Integer-keyed record with an embedded audit block.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub age: i32,
    pub note: String,
    pub audit: Audit,
    pub token: String,
}

static USER_DECL: RecordDecl = RecordDecl {
    type_name: "fixtures::User",
    fields: &[
        FieldDecl::new("id", FieldKind::Int64).column("id"),
        FieldDecl::new("user_name", FieldKind::Text).column("user_name"),
        FieldDecl::new("age", FieldKind::Int32).column("age"),
        FieldDecl::new("note", FieldKind::Text),
        FieldDecl::new("audit", FieldKind::Record).embed(audit_decl),
        FieldDecl::new("token", FieldKind::Text).private(),
    ],
};

impl Record for User {
    fn record_decl() -> &'static RecordDecl {
        &USER_DECL
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(self.id.to_value()),
            "user_name" => Some(self.user_name.to_value()),
            "age" => Some(self.age.to_value()),
            "note" => Some(self.note.to_value()),
            "token" => Some(self.token.to_value()),
            _ => self.audit.get_field(name),
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<bool> {
        match name {
            "id" => self.id = FieldType::from_value(value)?,
            "user_name" => self.user_name = FieldType::from_value(value)?,
            "age" => self.age = FieldType::from_value(value)?,
            "note" => self.note = FieldType::from_value(value)?,
            "token" => self.token = FieldType::from_value(value)?,
            _ => return self.audit.set_field(name, value),
        }
        Ok(true)
    }
}

impl Entity for User {
    fn table_name(&self) -> &str {
        "t_user"
    }

    fn pk_column_name(&self) -> &str {
        "`ID`"
    }
}

/// Text-keyed record whose key comes from a sequence on oracle and a
/// trigger on postgresql.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Order {
    pub order_id: String,
    pub amount: f64,
}

static ORDER_DECL: RecordDecl = RecordDecl {
    type_name: "fixtures::Order",
    fields: &[
        FieldDecl::new("order_id", FieldKind::Text).column("order_id"),
        FieldDecl::new("amount", FieldKind::Float64).column("amount"),
    ],
};

impl Record for Order {
    fn record_decl() -> &'static RecordDecl {
        &ORDER_DECL
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "order_id" => Some(self.order_id.to_value()),
            "amount" => Some(self.amount.to_value()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<bool> {
        match name {
            "order_id" => self.order_id = FieldType::from_value(value)?,
            "amount" => self.amount = FieldType::from_value(value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Entity for Order {
    fn table_name(&self) -> &str {
        "t_order"
    }

    fn pk_column_name(&self) -> &str {
        "order_id"
    }

    fn pk_sequence(&self) -> Option<HashMap<String, String>> {
        Some(HashMap::from([
            ("oracle".to_string(), "SEQ_ORDER.nextval".to_string()),
            ("postgresql".to_string(), String::new()),
        ]))
    }
}
