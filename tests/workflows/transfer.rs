use estatecare::workflow::{LineItem, RequestStatus, Transfer, TransferInput};
use estatecare::{DocumentsExt, MovementKind, WorkflowError};

use crate::support::{admin, manager, staff, Fixture};

fn transfer(items: Vec<LineItem>) -> TransferInput {
    TransferInput {
        from_residence_id: "res-1".into(),
        to_residence_id: "res-2".into(),
        items,
        notes: None,
    }
}

#[test]
fn approved_transfer_moves_stock_between_residences() {
    let fx = Fixture::new();
    let created = fx
        .inventory
        .request_transfer(&staff(&["res-1"]), transfer(vec![LineItem::new("itm-filter", 4)]))
        .unwrap();
    assert_eq!(created.id, "TRF-25-08-001");
    assert_eq!(fx.stock("itm-filter", "res-1"), 10);
    assert!(fx.log_rows().is_empty());

    let notifications = fx.notifications.lock().unwrap().clone();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].event, "transfer.requested");
    assert_eq!(notifications[0].residence_id.as_deref(), Some("res-2"));

    let approved = fx
        .inventory
        .approve_transfer(&staff(&["res-2"]), &created.id)
        .unwrap();
    assert_eq!(approved.status, RequestStatus::Completed);

    assert_eq!(fx.stock("itm-filter", "res-1"), 6);
    assert_eq!(fx.stock("itm-filter", "res-2"), 4);
    assert_eq!(fx.item("itm-filter").total_stock, 10);

    let rows = fx.rows_for(&created.id);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.kind == MovementKind::Transfer));
    assert_eq!(rows.iter().map(|row| row.delta).sum::<i64>(), 0);
}

#[test]
fn rejected_transfer_writes_no_log_rows() {
    let fx = Fixture::new();
    let created = fx
        .inventory
        .request_transfer(&staff(&["res-1"]), transfer(vec![LineItem::new("itm-bulb", 2)]))
        .unwrap();

    let rejected = fx
        .inventory
        .reject_transfer(&manager(&["res-2"]), &created.id, "not needed")
        .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert_eq!(fx.stock("itm-bulb", "res-1"), 4);
    assert_eq!(fx.stock("itm-bulb", "res-2"), 6);
    assert!(fx.log_rows().is_empty());
}

#[test]
fn only_the_destination_may_decide() {
    let fx = Fixture::new();
    let created = fx
        .inventory
        .request_transfer(&staff(&["res-1"]), transfer(vec![LineItem::new("itm-bulb", 1)]))
        .unwrap();

    let err = fx
        .inventory
        .approve_transfer(&manager(&["res-1"]), &created.id)
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));

    let stored = fx
        .store
        .documents::<Transfer>()
        .get(&created.id)
        .unwrap()
        .unwrap()
        .data;
    assert_eq!(stored.status, RequestStatus::Pending);
}

#[test]
fn request_checks_source_availability() {
    let fx = Fixture::new();
    let err = fx
        .inventory
        .request_transfer(&staff(&["res-1"]), transfer(vec![LineItem::new("itm-bulb", 5)]))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InsufficientStock { available: 4, .. }));
    assert!(fx.store.documents::<Transfer>().all().unwrap().is_empty());
}

#[test]
fn approval_rechecks_stock_that_moved_meanwhile() {
    let fx = Fixture::new();
    let created = fx
        .inventory
        .request_transfer(&staff(&["res-1"]), transfer(vec![LineItem::new("itm-filter", 8)]))
        .unwrap();

    // Stock drains before the destination approves.
    fx.inventory
        .issue_miv(
            &staff(&["res-1"]),
            estatecare::workflow::MivInput {
                residence_id: "res-1".into(),
                location: None,
                items: vec![LineItem::new("itm-filter", 5)],
                notes: None,
            },
        )
        .unwrap();

    let err = fx
        .inventory
        .approve_transfer(&admin(), &created.id)
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InsufficientStock { available: 5, requested: 8, .. }));
    assert_eq!(fx.stock("itm-filter", "res-1"), 5);
    assert_eq!(fx.stock("itm-filter", "res-2"), 0);
}

#[test]
fn same_residence_on_both_ends_is_invalid() {
    let fx = Fixture::new();
    let mut input = transfer(vec![LineItem::new("itm-filter", 1)]);
    input.to_residence_id = "res-1".into();
    let err = fx.inventory.request_transfer(&admin(), input).unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));
}

#[test]
fn unknown_transfer_is_not_found() {
    let fx = Fixture::new();
    let err = fx
        .inventory
        .approve_transfer(&admin(), "TRF-25-08-404")
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound { .. }));
}
