use estatecare::workflow::{AdjustmentInput, Reconciliation, ReconciliationInput};
use estatecare::{DocumentsExt, MovementKind, WorkflowError};

use crate::support::{manager, Fixture};

fn by_delta(item_id: &str, delta: i64) -> AdjustmentInput {
    AdjustmentInput {
        item_id: item_id.into(),
        delta: Some(delta),
        counted_quantity: None,
        location_id: None,
    }
}

fn by_count(item_id: &str, counted: i64) -> AdjustmentInput {
    AdjustmentInput {
        item_id: item_id.into(),
        delta: None,
        counted_quantity: Some(counted),
        location_id: Some("store-room".into()),
    }
}

fn input(adjustments: Vec<AdjustmentInput>) -> ReconciliationInput {
    ReconciliationInput {
        residence_id: "res-1".into(),
        reason: "monthly count".into(),
        adjustments,
    }
}

#[test]
fn deltas_and_counts_post_adjustment_rows() {
    let fx = Fixture::new();
    let created = fx
        .inventory
        .post_reconciliation(
            &manager(&["res-1"]),
            input(vec![by_count("itm-filter", 7), by_delta("itm-bulb", 2)]),
        )
        .unwrap();
    assert_eq!(created.id, "REC-25-08-001");

    assert_eq!(fx.stock("itm-filter", "res-1"), 7);
    assert_eq!(fx.stock("itm-bulb", "res-1"), 6);

    let rec = fx
        .store
        .documents::<Reconciliation>()
        .get(&created.id)
        .unwrap()
        .unwrap()
        .data;
    assert_eq!(rec.total_increase, 2);
    assert_eq!(rec.total_decrease, 3);
    assert_eq!(rec.adjustments[0].previous, 10);
    assert_eq!(rec.adjustments[0].delta, -3);

    let rows = fx.rows_for(&created.id);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.kind == MovementKind::Adjustment));
    assert!(rows.iter().all(|row| row.notes.as_deref() == Some("monthly count")));
}

#[test]
fn count_matching_stock_writes_no_row() {
    let fx = Fixture::new();
    let created = fx
        .inventory
        .post_reconciliation(&manager(&["res-1"]), input(vec![by_count("itm-filter", 10)]))
        .unwrap();
    assert!(fx.rows_for(&created.id).is_empty());
    assert_eq!(fx.stock("itm-filter", "res-1"), 10);
}

#[test]
fn decrease_below_zero_is_refused() {
    let fx = Fixture::new();
    let err = fx
        .inventory
        .post_reconciliation(&manager(&["res-1"]), input(vec![by_delta("itm-bulb", -5)]))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InsufficientStock { .. }));
    assert!(fx.store.documents::<Reconciliation>().all().unwrap().is_empty());
}

#[test]
fn reason_is_required() {
    let fx = Fixture::new();
    let mut posting = input(vec![by_delta("itm-bulb", 1)]);
    posting.reason = "  ".into();
    let err = fx
        .inventory
        .post_reconciliation(&manager(&["res-1"]), posting)
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));
}

#[test]
fn oversized_delta_is_refused() {
    let fx = Fixture::new();
    let err = fx
        .inventory
        .post_reconciliation(&manager(&["res-1"]), input(vec![by_delta("itm-bulb", i64::MIN)]))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));
    assert_eq!(fx.stock("itm-bulb", "res-1"), 4);
}

#[test]
fn count_against_corrupt_stock_is_refused() {
    use estatecare::Item;

    let fx = Fixture::new();
    let mut corrupt = fx.item("itm-valve");
    corrupt.stock_by_residence.insert("res-1".into(), i64::MIN);
    fx.store.documents::<Item>().save(&corrupt).unwrap();

    let err = fx
        .inventory
        .post_reconciliation(&manager(&["res-1"]), input(vec![by_count("itm-valve", 0)]))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));
    assert!(fx.log_rows().is_empty());
    assert!(fx.store.documents::<Reconciliation>().all().unwrap().is_empty());
}
