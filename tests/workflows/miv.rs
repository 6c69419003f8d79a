use estatecare::workflow::{LineItem, Location, Miv, MivInput};
use estatecare::{DocumentsExt, MovementKind, WorkflowError};

use crate::support::{staff, Fixture};

fn issue(items: Vec<LineItem>) -> MivInput {
    MivInput {
        residence_id: "res-1".into(),
        location: Some(Location {
            building: Some("A".into()),
            floor: Some("3".into()),
            room: Some("301".into()),
        }),
        items,
        notes: Some("quarterly replacement".into()),
    }
}

#[test]
fn issue_decrements_and_logs_out_rows() {
    let fx = Fixture::new();
    let created = fx
        .inventory
        .issue_miv(&staff(&["res-1"]), issue(vec![LineItem::new("itm-filter", 3)]))
        .unwrap();

    assert_eq!(created.id, "MIV-25-08-001");
    assert_eq!(fx.stock("itm-filter", "res-1"), 7);
    assert_eq!(fx.item("itm-filter").total_stock, 7);

    let rows = fx.rows_for(&created.id);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, MovementKind::Out);
    assert_eq!(rows[0].quantity, 3);
    assert_eq!(rows[0].delta, -3);
    assert_eq!(rows[0].location_id.as_deref(), Some("A/3/301"));

    let miv = fx.store.documents::<Miv>().get(&created.id).unwrap().unwrap().data;
    assert_eq!(miv.items, vec![LineItem::new("itm-filter", 3)]);
}

#[test]
fn over_issue_fails_and_changes_nothing() {
    let fx = Fixture::new();
    let err = fx
        .inventory
        .issue_miv(&staff(&["res-1"]), issue(vec![LineItem::new("itm-filter", 15)]))
        .unwrap_err();

    assert_eq!(
        err,
        WorkflowError::InsufficientStock {
            item_id: "itm-filter".into(),
            residence_id: "res-1".into(),
            available: 10,
            requested: 15,
        }
    );
    assert_eq!(fx.stock("itm-filter", "res-1"), 10);
    assert!(fx.log_rows().is_empty());
    assert!(fx.store.documents::<Miv>().all().unwrap().is_empty());
}

#[test]
fn one_short_line_rejects_the_whole_issue() {
    let fx = Fixture::new();
    let err = fx
        .inventory
        .issue_miv(
            &staff(&["res-1"]),
            issue(vec![LineItem::new("itm-filter", 2), LineItem::new("itm-bulb", 5)]),
        )
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InsufficientStock { .. }));
    assert_eq!(fx.stock("itm-filter", "res-1"), 10);
    assert_eq!(fx.stock("itm-bulb", "res-1"), 4);
}

#[test]
fn stock_at_other_residences_is_not_available() {
    let fx = Fixture::new();
    // res-2 holds bulbs but res-1 only has 4.
    let err = fx
        .inventory
        .issue_miv(&staff(&["res-1"]), issue(vec![LineItem::new("itm-bulb", 6)]))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InsufficientStock { available: 4, .. }));
}

#[test]
fn staff_cannot_issue_from_unassigned_residence() {
    let fx = Fixture::new();
    let mut input = issue(vec![LineItem::new("itm-bulb", 1)]);
    input.residence_id = "res-2".into();
    let err = fx.inventory.issue_miv(&staff(&["res-1"]), input).unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));
    assert_eq!(fx.stock("itm-bulb", "res-2"), 6);
}
