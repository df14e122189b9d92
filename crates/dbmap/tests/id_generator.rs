//! Runs in its own binary: the generator is process-wide.

mod common;

use std::sync::atomic::{AtomicU32, Ordering};

use common::Order;
use dbmap::prelude::*;
use dbmap::{generate_string_id, reset_id_generator, set_id_generator};

static NEXT: AtomicU32 = AtomicU32::new(1);

#[test]
fn custom_generator_feeds_text_keys() {
    set_id_generator(|| format!("K{:04}", NEXT.fetch_add(1, Ordering::SeqCst)));

    let mut orders = vec![Order::default(), Order::default()];
    let stmt = SqlBuilder::new(Dialect::Mysql)
        .insert_batch(&mut orders)
        .unwrap();
    assert_eq!(orders[0].order_id, "K0001");
    assert_eq!(orders[1].order_id, "K0002");
    assert_eq!(stmt.params[3], Value::Text("K0002".to_string()));

    set_id_generator(String::new);
    let mut order = Order::default();
    let err = SqlBuilder::new(Dialect::Mysql)
        .insert(&mut order)
        .unwrap_err();
    assert!(matches!(err, Error::Mapping { .. }));

    reset_id_generator();
    assert_eq!(generate_string_id().unwrap().len(), 32);
}
