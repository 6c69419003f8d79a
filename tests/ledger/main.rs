//! Stock ledger integration tests.

use std::sync::Arc;
use std::thread;

use chrono::{DateTime, TimeZone, Utc};
use estatecare::ledger::{self, repair_negative_stock, LedgerError, REPAIR_REFERENCE};
use estatecare::transaction;
use estatecare::{
    DocumentsExt, InMemoryDocumentStore, InventoryTransaction, Item, Movement, MovementKind,
    TransactionOptions,
};

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 14, 10, 0, 0).unwrap()
}

fn store_with(item: Item) -> InMemoryDocumentStore {
    let store = InMemoryDocumentStore::new();
    store.documents::<Item>().save(&item).unwrap();
    store
}

fn item(id: &str) -> Item {
    Item::new(id, "Air filter", "فلتر هواء", "hvac", "pcs")
}

fn post(
    store: &InMemoryDocumentStore,
    movements: Vec<Movement>,
) -> Result<Vec<InventoryTransaction>, LedgerError> {
    transaction::run(store, &TransactionOptions::default(), |tx| {
        ledger::post(tx, movements.clone(), at())
    })
}

fn load(store: &InMemoryDocumentStore, id: &str) -> Item {
    store.documents::<Item>().get(id).unwrap().unwrap().data
}

fn log_rows(store: &InMemoryDocumentStore) -> Vec<InventoryTransaction> {
    store
        .documents::<InventoryTransaction>()
        .all()
        .unwrap()
        .into_iter()
        .map(|v| v.data)
        .collect()
}

#[test]
fn issuing_three_of_ten_leaves_seven() {
    let store = store_with(item("itm-1").with_stock("res-1", 10));

    post(
        &store,
        vec![Movement::new("itm-1", "res-1", -3, MovementKind::Out, "MIV-25-08-001")],
    )
    .unwrap();

    let item = load(&store, "itm-1");
    assert_eq!(item.stock_at("res-1"), 7);
    assert_eq!(item.total_stock, 7);

    let rows = log_rows(&store);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].quantity, 3);
    assert_eq!(rows[0].kind, MovementKind::Out);
    assert_eq!(rows[0].reference, "MIV-25-08-001");
}

#[test]
fn issuing_fifteen_of_ten_changes_nothing() {
    let store = store_with(item("itm-1").with_stock("res-1", 10));

    let err = post(
        &store,
        vec![Movement::new("itm-1", "res-1", -15, MovementKind::Out, "MIV-25-08-001")],
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientStock { available: 10, requested: 15, .. }));

    assert_eq!(load(&store, "itm-1").stock_at("res-1"), 10);
    assert!(log_rows(&store).is_empty());
}

#[test]
fn stored_quantity_is_initial_plus_applied_deltas() {
    let initial = 20;
    let store = store_with(item("itm-1").with_stock("res-1", initial).with_stock("res-2", 4));

    // Deterministic pseudo-random walk; rejected steps are not counted.
    let mut seed: u64 = 0x5eed;
    let mut applied = 0;
    for step in 0..200 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let delta = (seed >> 33) as i64 % 13 - 6;
        if delta == 0 {
            continue;
        }
        let kind = if delta > 0 { MovementKind::In } else { MovementKind::Out };
        let reference = format!("step-{}", step);
        match post(&store, vec![Movement::new("itm-1", "res-1", delta, kind, reference)]) {
            Ok(_) => applied += delta,
            Err(LedgerError::InsufficientStock { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }

        let item = load(&store, "itm-1");
        assert!(item.stock_at("res-1") >= 0);
        assert_eq!(item.total_stock, item.stock_by_residence.values().sum::<i64>());
    }

    let item = load(&store, "itm-1");
    assert_eq!(item.stock_at("res-1"), initial + applied);
    assert_eq!(item.stock_at("res-2"), 4);

    let logged: i64 = log_rows(&store).iter().map(|row| row.delta).sum();
    assert_eq!(logged, applied);
}

#[test]
fn concurrent_issues_never_oversell() {
    let store = Arc::new(store_with(item("itm-1").with_stock("res-1", 5)));

    let handles: Vec<_> = (0..10)
        .map(|n| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                transaction::run(
                    store.as_ref(),
                    &TransactionOptions::with_max_attempts(1_000),
                    |tx| {
                        ledger::post(
                            tx,
                            [Movement::new(
                                "itm-1",
                                "res-1",
                                -1,
                                MovementKind::Out,
                                format!("MIV-25-08-{:03}", n + 1),
                            )],
                            at(),
                        )
                    },
                )
                .is_ok()
            })
        })
        .collect();

    let succeeded = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(succeeded, 5);
    assert_eq!(load(&store, "itm-1").stock_at("res-1"), 0);
    assert_eq!(log_rows(&store).len(), 5);
}

#[test]
fn receiving_into_negative_stock_is_allowed() {
    let mut broken = item("itm-1");
    broken.stock_by_residence.insert("res-1".into(), -4);
    broken.recompute_total().unwrap();
    let store = store_with(broken);

    post(
        &store,
        vec![Movement::new("itm-1", "res-1", 1, MovementKind::In, "MRV-25-08-001")],
    )
    .unwrap();
    assert_eq!(load(&store, "itm-1").stock_at("res-1"), -3);

    let err = post(
        &store,
        vec![Movement::new("itm-1", "res-1", -1, MovementKind::Out, "MIV-25-08-001")],
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientStock { .. }));
}

#[test]
fn repair_is_idempotent_and_auditable() {
    let store = InMemoryDocumentStore::new();
    let items = store.documents::<Item>();
    let mut a = item("itm-a");
    a.stock_by_residence.insert("res-1".into(), -3);
    a.stock_by_residence.insert("res-2".into(), 2);
    a.recompute_total().unwrap();
    let mut b = item("itm-b");
    b.stock_by_residence.insert("res-1".into(), -1);
    b.recompute_total().unwrap();
    items.save(&a).unwrap();
    items.save(&b).unwrap();
    items.save(&item("itm-c").with_stock("res-1", 9)).unwrap();

    let options = TransactionOptions::default();
    let first = repair_negative_stock(&store, &options, at()).unwrap();
    assert_eq!(first.items_scanned, 3);
    assert_eq!(first.entries_fixed, 2);
    assert_eq!(first.units_restored, 4);

    let snapshot: Vec<_> = items.all().unwrap();
    let second = repair_negative_stock(&store, &options, at()).unwrap();
    assert_eq!(second.entries_fixed, 0);
    assert_eq!(items.all().unwrap(), snapshot);

    let rows = log_rows(&store);
    assert_eq!(rows.len(), 2);
    assert!(rows
        .iter()
        .all(|row| row.kind == MovementKind::Adjustment && row.reference == REPAIR_REFERENCE));
    assert_eq!(load(&store, "itm-a").total_stock, 2);
}
