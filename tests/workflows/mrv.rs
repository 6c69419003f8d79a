use estatecare::workflow::{LineItem, Mrv, MrvInput, MrvMeta, RequestStatus};
use estatecare::{DocumentsExt, MovementKind, WorkflowError};

use crate::support::{manager, staff, Fixture};

fn receipt(items: Vec<LineItem>) -> MrvInput {
    MrvInput {
        residence_id: "res-1".into(),
        items,
        meta: MrvMeta {
            supplier_name: Some("Gulf Supplies".into()),
            invoice_no: Some("INV-7781".into()),
            notes: None,
        },
    }
}

#[test]
fn receive_records_stock_immediately() {
    let fx = Fixture::new();
    let created = fx
        .inventory
        .receive_mrv(&staff(&["res-1"]), receipt(vec![LineItem::new("itm-filter", 5)]))
        .unwrap();

    assert_eq!(created.id, "MRV-25-08-001");
    assert_eq!(created.short, "MRV-25081");
    assert_eq!(fx.stock("itm-filter", "res-1"), 15);

    let rows = fx.rows_for("MRV-25-08-001");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, MovementKind::In);
    assert_eq!(rows[0].delta, 5);

    let mrv = fx.store.documents::<Mrv>().get(&created.id).unwrap().unwrap().data;
    assert_eq!(mrv.status, RequestStatus::Completed);
    assert_eq!(mrv.meta.invoice_no.as_deref(), Some("INV-7781"));
}

#[test]
fn second_receipt_in_month_gets_next_sequence() {
    let fx = Fixture::new();
    let actor = staff(&["res-1"]);
    fx.inventory
        .receive_mrv(&actor, receipt(vec![LineItem::new("itm-filter", 1)]))
        .unwrap();
    let second = fx
        .inventory
        .receive_mrv(&actor, receipt(vec![LineItem::new("itm-bulb", 1)]))
        .unwrap();
    assert_eq!(second.id, "MRV-25-08-002");
    assert_eq!(second.short, "MRV-25082");
}

#[test]
fn request_then_approve_receives_once() {
    let fx = Fixture::new();
    let created = fx
        .inventory
        .request_mrv(
            &staff(&["res-1"]),
            receipt(vec![LineItem::new("itm-valve", 3), LineItem::new("itm-valve", 2)]),
        )
        .unwrap();

    assert_eq!(fx.stock("itm-valve", "res-1"), 0);
    assert!(fx.log_rows().is_empty());
    assert_eq!(fx.notified(), vec!["mrv.requested"]);

    let approved = fx
        .inventory
        .approve_mrv(&manager(&["res-1"]), &created.id)
        .unwrap();
    assert_eq!(approved.status, RequestStatus::Completed);
    assert_eq!(approved.audit.approved_by.as_deref(), Some("manager-1"));

    // Duplicate lines net into one movement.
    assert_eq!(fx.stock("itm-valve", "res-1"), 5);
    assert_eq!(fx.rows_for(&created.id).len(), 1);

    let err = fx
        .inventory
        .approve_mrv(&manager(&["res-1"]), &created.id)
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidState { action: "approve", .. }));
    assert_eq!(fx.stock("itm-valve", "res-1"), 5);
}

#[test]
fn rejected_request_leaves_no_trace_in_the_ledger() {
    let fx = Fixture::new();
    let created = fx
        .inventory
        .request_mrv(&staff(&["res-1"]), receipt(vec![LineItem::new("itm-filter", 4)]))
        .unwrap();

    let rejected = fx
        .inventory
        .reject_mrv(&manager(&["res-1"]), &created.id, "wrong supplier")
        .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert_eq!(rejected.audit.rejection_reason.as_deref(), Some("wrong supplier"));

    assert_eq!(fx.stock("itm-filter", "res-1"), 10);
    assert!(fx.log_rows().is_empty());

    let err = fx
        .inventory
        .approve_mrv(&manager(&["res-1"]), &created.id)
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidState { .. }));
}

#[test]
fn staff_cannot_approve() {
    let fx = Fixture::new();
    let created = fx
        .inventory
        .request_mrv(&staff(&["res-1"]), receipt(vec![LineItem::new("itm-filter", 1)]))
        .unwrap();
    let err = fx
        .inventory
        .approve_mrv(&staff(&["res-1"]), &created.id)
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));
}

#[test]
fn unassigned_residence_is_forbidden() {
    let fx = Fixture::new();
    let err = fx
        .inventory
        .receive_mrv(&staff(&["res-2"]), receipt(vec![LineItem::new("itm-filter", 1)]))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));
}

#[test]
fn invalid_input_writes_nothing() {
    let fx = Fixture::new();
    let actor = staff(&["res-1"]);

    let err = fx.inventory.receive_mrv(&actor, receipt(vec![])).unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));

    let err = fx
        .inventory
        .receive_mrv(&actor, receipt(vec![LineItem::new("itm-ghost", 1)]))
        .unwrap_err();
    assert_eq!(
        err,
        WorkflowError::NotFound {
            collection: "items".into(),
            id: "itm-ghost".into()
        }
    );

    // Neither attempt consumed a number.
    let created = fx
        .inventory
        .receive_mrv(&actor, receipt(vec![LineItem::new("itm-filter", 1)]))
        .unwrap();
    assert_eq!(created.id, "MRV-25-08-001");
}

#[test]
fn unknown_residence_is_a_validation_error() {
    let fx = Fixture::new();
    let mut input = receipt(vec![LineItem::new("itm-filter", 1)]);
    input.residence_id = "res-9".into();
    let err = fx
        .inventory
        .receive_mrv(&estatecare::Actor::admin("root"), input)
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));
}

#[test]
fn numbering_restarts_each_month() {
    use chrono::{TimeZone, Utc};

    let fx = Fixture::new();
    let actor = staff(&["res-1"]);
    fx.inventory
        .receive_mrv(&actor, receipt(vec![LineItem::new("itm-filter", 1)]))
        .unwrap();

    fx.clock.set(Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap());
    let september = fx
        .inventory
        .receive_mrv(&actor, receipt(vec![LineItem::new("itm-filter", 1)]))
        .unwrap();
    assert_eq!(september.id, "MRV-25-09-001");
    assert_eq!(september.short, "MRV-25091");
}

#[test]
fn oversized_lines_are_rejected_before_any_write() {
    let fx = Fixture::new();
    let err = fx
        .inventory
        .receive_mrv(
            &staff(&["res-1"]),
            receipt(vec![
                LineItem::new("itm-valve", i64::MAX),
                LineItem::new("itm-valve", i64::MAX),
            ]),
        )
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Validation(_)));
    assert_eq!(fx.stock("itm-valve", "res-1"), 0);
    assert!(fx.log_rows().is_empty());
}

#[test]
fn receipt_that_would_overflow_stock_is_rejected() {
    use estatecare::Item;

    let fx = Fixture::new();
    let near_limit = i64::MAX - 5;
    fx.store
        .documents::<Item>()
        .save(&fx.item("itm-valve").with_stock("res-1", near_limit))
        .unwrap();

    let err = fx
        .inventory
        .receive_mrv(&staff(&["res-1"]), receipt(vec![LineItem::new("itm-valve", 10)]))
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Validation(ref message) if message.contains("out of range")));
    assert_eq!(fx.stock("itm-valve", "res-1"), near_limit);
    assert!(fx.log_rows().is_empty());
}
