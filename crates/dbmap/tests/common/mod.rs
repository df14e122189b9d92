//! Records and an in-memory cursor shared by the integration tests.

#![allow(dead_code)]

use dbmap::{BoxError, ColumnType, Record, RowCursor, ScanTarget, Value};

#[derive(Record, Debug, Default, Clone, PartialEq)]
pub struct Audit {
    #[dbmap(column = "created_by")]
    pub created_by: String,
    #[dbmap(column = "updated_at")]
    pub updated_at: Option<dbmap::NaiveDateTime>,
}

#[derive(Record, Debug, Default, Clone, PartialEq)]
#[dbmap(table = "t_user", pk = "`id`")]
pub struct User {
    #[dbmap(column = "id")]
    pub id: i64,
    #[dbmap(column = "user_name")]
    pub user_name: String,
    #[dbmap(column = "age")]
    pub age: i32,
    /// Exported without a column
    pub nickname: String,
    #[dbmap(embed)]
    pub audit: Audit,
    #[dbmap(column = "password")]
    secret: String,
    #[dbmap(skip)]
    pub scratch: Vec<String>,
}

impl User {
    pub fn new(id: i64, user_name: &str, age: i32) -> Self {
        Self {
            id,
            user_name: user_name.to_string(),
            age,
            ..Self::default()
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

#[derive(Record, Debug, Default, Clone, PartialEq)]
#[dbmap(
    table = "t_order",
    pk = "order_id",
    sequence(oracle = "SEQ_ORDER.nextval", postgresql = "")
)]
pub struct Order {
    #[dbmap(column = "order_id")]
    pub order_id: String,
    #[dbmap(column = "amount")]
    pub amount: dbmap::Decimal,
    #[dbmap(column = "paid")]
    pub paid: bool,
}

/// In-memory cursor over fixed rows.
pub struct MockCursor {
    columns: Vec<ColumnType>,
    rows: Vec<Vec<Value>>,
    position: Option<usize>,
}

impl MockCursor {
    pub fn new(columns: &[(&str, &str)], rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|(name, ty)| ColumnType::new(*name, *ty))
                .collect(),
            rows,
            position: None,
        }
    }

    fn current(&self) -> &[Value] {
        match self.position {
            Some(p) if p < self.rows.len() => self.rows[p].as_slice(),
            _ => &[],
        }
    }
}

impl RowCursor for MockCursor {
    fn column_types(&self) -> &[ColumnType] {
        &self.columns
    }

    fn advance(&mut self) -> Result<bool, BoxError> {
        let next = self.position.map_or(0, |p| p + 1);
        self.position = Some(next);
        Ok(next < self.rows.len())
    }

    fn is_null(&self, index: usize) -> bool {
        self.current().get(index).is_none_or(Value::is_null)
    }

    fn scan(&mut self, targets: &mut [Box<dyn ScanTarget>]) -> Result<(), BoxError> {
        let row = self.current().to_vec();
        for (target, value) in targets.iter_mut().zip(row) {
            target.assign(value)?;
        }
        Ok(())
    }
}
