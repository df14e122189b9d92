mod common;

use common::{Order, User};
use dbmap::prelude::*;
use dbmap::{Decimal, PkStrategy, UnsupportedKind};

#[test]
fn insert_drops_zero_integer_key() {
    let mut user = User::new(0, "ann", 30);
    let stmt = SqlBuilder::new(Dialect::Mysql).insert(&mut user).unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO t_user(user_name,age,created_by,updated_at) VALUES (?,?,?,?)"
    );
    assert_eq!(
        stmt.params,
        vec![
            Value::Text("ann".to_string()),
            Value::Int(30),
            Value::Text(String::new()),
            Value::Null,
        ]
    );
    let pk = stmt.pk.unwrap();
    assert_eq!(pk.column, "id");
    assert_eq!(pk.strategy, PkStrategy::AutoIncrement);
    assert!(stmt.database_key);
}

#[test]
fn insert_binds_assigned_integer_key() {
    let mut user = User::new(42, "ann", 30);
    let stmt = SqlBuilder::new(Dialect::Postgresql)
        .insert(&mut user)
        .unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO t_user(id,user_name,age,created_by,updated_at) VALUES ($1,$2,$3,$4,$5)"
    );
    assert_eq!(stmt.params[0], Value::BigInt(42));
    assert!(!stmt.database_key);
}

#[test]
fn insert_generates_text_key() {
    let mut order = Order {
        amount: Decimal::new(1999, 2),
        ..Order::default()
    };
    let stmt = SqlBuilder::new(Dialect::Mysql).insert(&mut order).unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO t_order(order_id,amount,paid) VALUES (?,?,?)"
    );
    assert_eq!(order.order_id.len(), 32);
    assert_eq!(stmt.params[0], Value::Text(order.order_id.clone()));
    assert_eq!(stmt.params[1], Value::Decimal(Decimal::new(1999, 2)));
    assert!(!stmt.database_key);
}

#[test]
fn insert_uses_sequence_or_trigger_per_dialect() {
    let mut order = Order::default();

    let stmt = SqlBuilder::new(Dialect::Oracle).insert(&mut order).unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO t_order(order_id,amount,paid) VALUES (SEQ_ORDER.nextval,:1,:2)"
    );
    assert_eq!(stmt.params.len(), 2);
    assert_eq!(
        stmt.pk.as_ref().map(|pk| pk.strategy.clone()),
        Some(PkStrategy::Sequence("SEQ_ORDER.nextval".to_string()))
    );

    let stmt = SqlBuilder::new(Dialect::Postgresql)
        .insert(&mut order)
        .unwrap();
    assert_eq!(stmt.sql, "INSERT INTO t_order(amount,paid) VALUES ($1,$2)");
    assert!(stmt.database_key);
    assert!(order.order_id.is_empty());
}

#[test]
fn kingbase_uppercases_and_quotes_columns() {
    let mut user = User::new(0, "ann", 30);
    let stmt = SqlBuilder::new(Dialect::Kingbase)
        .insert(&mut user)
        .unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO t_user(\"USER_NAME\",\"AGE\",\"CREATED_BY\",\"UPDATED_AT\") VALUES ($1,$2,$3,$4)"
    );

    let stmt = SqlBuilder::new(Dialect::Kingbase)
        .update(&User::new(3, "bo", 0), true)
        .unwrap();
    assert_eq!(stmt.sql, "UPDATE t_user SET \"USER_NAME\"=$1 WHERE `id`=$2");
}

#[test]
fn batch_insert_appends_value_tuples() {
    let mut users = vec![
        User::new(0, "a", 1),
        User::new(0, "b", 2),
        User::new(0, "c", 3),
    ];
    let stmt = SqlBuilder::new(Dialect::Mssql)
        .insert_batch(&mut users)
        .unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO t_user(user_name,age,created_by,updated_at) VALUES (@p1,@p2,@p3,@p4), (@p5,@p6,@p7,@p8), (@p9,@p10,@p11,@p12)"
    );
    assert_eq!(stmt.params.len(), 12);
    assert_eq!(stmt.params[8], Value::Text("c".to_string()));
}

#[test]
fn batch_insert_generates_each_text_key() {
    let mut orders = vec![Order::default(), Order::default(), Order::default()];
    let stmt = SqlBuilder::new(Dialect::Mysql)
        .insert_batch(&mut orders)
        .unwrap();
    assert_eq!(stmt.params.len(), 9);
    for (index, order) in orders.iter().enumerate() {
        assert!(!order.order_id.is_empty());
        assert_eq!(stmt.params[index * 3], Value::Text(order.order_id.clone()));
    }
}

#[test]
fn batch_insert_keeps_sequence_literal() {
    let mut orders = vec![Order::default(), Order::default()];
    let stmt = SqlBuilder::new(Dialect::Oracle)
        .insert_batch(&mut orders)
        .unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO t_order(order_id,amount,paid) VALUES (SEQ_ORDER.nextval,:1,:2), (SEQ_ORDER.nextval,:3,:4)"
    );
    assert_eq!(stmt.params.len(), 4);
}

#[test]
fn tdengine_batch_names_table_per_record() {
    let mut users = vec![User::new(0, "a", 1), User::new(0, "b", 2)];
    let stmt = SqlBuilder::new(Dialect::Tdengine)
        .insert_batch(&mut users)
        .unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO t_user VALUES ('?',?,'?',?) t_user VALUES ('?',?,'?',?)"
    );
}

#[test]
fn update_and_delete_by_declared_key() {
    let order = Order {
        order_id: "O-1".to_string(),
        amount: Decimal::new(5, 0),
        paid: true,
    };
    let builder = SqlBuilder::new(Dialect::Oracle);

    let stmt = builder.update(&order, false).unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE t_order SET amount=:1,paid=:2 WHERE order_id=:3"
    );
    assert_eq!(stmt.params[2], Value::Text("O-1".to_string()));

    let stmt = builder.delete(&order).unwrap();
    assert_eq!(stmt.sql, "DELETE FROM t_order WHERE order_id=:1");
    assert_eq!(stmt.params, vec![Value::Text("O-1".to_string())]);
}

#[test]
fn update_skipping_zero_values() {
    let stmt = SqlBuilder::new(Dialect::Mysql)
        .update(&User::new(7, "x", 0), true)
        .unwrap();
    assert_eq!(stmt.sql, "UPDATE t_user SET user_name=? WHERE `id`=?");
    assert_eq!(
        stmt.params,
        vec![Value::Text("x".to_string()), Value::BigInt(7)]
    );
}

#[test]
fn clickhouse_mutations_use_alter_table() {
    let builder = SqlBuilder::new(Dialect::Clickhouse);
    let user = User::new(7, "x", 1);

    let stmt = builder.delete(&user).unwrap();
    assert_eq!(stmt.sql, "ALTER TABLE t_user DELETE WHERE `id`=?");

    let stmt = builder.update(&user, true).unwrap();
    assert_eq!(stmt.sql, "ALTER TABLE t_user UPDATE user_name=?,age=? WHERE `id`=?");
}

#[test]
fn map_insert_and_update() {
    let mut row = EntityMap::new("t_log", "id").with_sequence("Oracle", "SEQ_LOG.nextval");
    row.set("level", "warn");
    row.set("code", 12_i32);

    let stmt = SqlBuilder::new(Dialect::Oracle).insert_map(&row).unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO t_log(id,level,code) VALUES (SEQ_LOG.nextval,:1,:2)"
    );
    assert_eq!(stmt.params.len(), 2);

    row.set("id", 3_i64);
    let stmt = SqlBuilder::new(Dialect::Oracle).insert_map(&row).unwrap();
    assert_eq!(stmt.sql, "INSERT INTO t_log(level,code,id) VALUES (:1,:2,:3)");
    assert!(!stmt.database_key);

    let stmt = SqlBuilder::new(Dialect::Postgresql)
        .update_map(&row)
        .unwrap();
    assert_eq!(stmt.sql, "UPDATE t_log SET level=$1,code=$2 WHERE id=$3");
    assert_eq!(stmt.params[2], Value::BigInt(3));
}

#[test]
fn empty_inputs_are_rejected() {
    let builder = SqlBuilder::new(Dialect::Mysql);

    let mut none: Vec<User> = Vec::new();
    let err = builder.insert_batch(&mut none).unwrap_err();
    assert_eq!(err.unsupported_kind(), Some(UnsupportedKind::EmptyInput));

    let err = builder.insert_map(&EntityMap::new("t", "id")).unwrap_err();
    assert_eq!(err.unsupported_kind(), Some(UnsupportedKind::EmptyInput));

    let mut only_pk = EntityMap::new("t", "id");
    only_pk.set("id", 1_i64);
    let err = builder.update_map(&only_pk).unwrap_err();
    assert_eq!(err.unsupported_kind(), Some(UnsupportedKind::EmptyInput));
}

#[test]
fn paginated_select_and_count() {
    let builder = SqlBuilder::new(Dialect::Mssql);
    let page = Page::new(2, 10).unwrap();
    let sql = "SELECT id,user_name FROM t_user WHERE age>? ORDER BY id";

    let stmt = builder
        .select(sql, vec![Value::Int(18)], Some(&page))
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT id,user_name FROM t_user WHERE age>@p1 ORDER BY id OFFSET 10 ROWS FETCH NEXT 10 ROWS ONLY"
    );

    let stmt = builder.count(sql, vec![Value::Int(18)]).unwrap();
    assert_eq!(stmt.sql, "SELECT COUNT(*) FROM t_user WHERE age>@p1");

    let stmt = builder
        .count("SELECT DISTINCT age FROM t_user", Vec::new())
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT COUNT(*) frame_row_count FROM (SELECT DISTINCT age FROM t_user) temp_frame_noob_table_name WHERE 1=1"
    );
}

#[test]
fn select_without_page_is_only_rebound() {
    let stmt = SqlBuilder::new(Dialect::Oracle)
        .select("SELECT * FROM t WHERE a=? AND b=?", vec![Value::Int(1), Value::Int(2)], None)
        .unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM t WHERE a=:1 AND b=:2");
}

#[test]
fn unknown_dialect_cannot_paginate() {
    let builder = SqlBuilder::new(Dialect::Other("db2".to_string()));
    let page = Page::new(1, 10).unwrap();
    let err = builder
        .select("SELECT * FROM t", Vec::new(), Some(&page))
        .unwrap_err();
    assert_eq!(err.unsupported_kind(), Some(UnsupportedKind::Dialect));
}

#[test]
fn builder_from_config_and_hint() {
    let config: BuilderConfig =
        serde_json::from_str(r#"{"dialect":"pg","print_sql":true}"#).unwrap();
    let builder = SqlBuilder::from_config(&config);
    assert_eq!(builder.dialect(), &Dialect::Postgresql);

    let ctx = QueryContext::new().with_hint("/*+ SeqScan(t_user) */");
    let stmt = builder
        .select("SELECT * FROM t_user WHERE id=?", vec![Value::BigInt(1)], None)
        .unwrap()
        .with_context(&ctx);
    assert_eq!(
        stmt.sql,
        "SELECT /*+ SeqScan(t_user) */ * FROM t_user WHERE id=$1"
    );
}
