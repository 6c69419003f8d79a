//! Command dispatch: handlers, guards and status mapping.

use std::collections::HashMap;

use estatecare::microsvc::{CommandRequest, HandlerError, Session};
use serde_json::json;

use crate::support::{admin, manager, service, staff, stock};

fn issue(quantity: i64) -> serde_json::Value {
    json!({
        "residenceId": "res-1",
        "location": { "building": "A", "room": "12" },
        "items": [{ "id": "itm-filter", "quantity": quantity }]
    })
}

#[test]
fn every_command_is_registered() {
    let service = service();
    assert_eq!(
        service.commands(),
        vec![
            "item.create",
            "miv.issue",
            "mrv.approve",
            "mrv.receive",
            "mrv.reject",
            "mrv.request",
            "reconciliation.post",
            "residence.create",
            "service-order.close",
            "service-order.create",
            "service-order.return",
            "stock.recompute-totals",
            "stock.repair-negative",
            "transfer.approve",
            "transfer.reject",
            "transfer.request",
        ]
    );
}

#[test]
fn issue_returns_both_ids() {
    let service = service();
    let body = service.dispatch("miv.issue", issue(3), staff()).unwrap();
    assert_eq!(body, json!({ "id": "MIV-25-08-001", "short": "MIV-25081" }));
    assert_eq!(stock(&service, "itm-filter", "res-1"), 7);
}

#[test]
fn missing_identity_is_unauthorized() {
    let err = service()
        .dispatch("miv.issue", issue(1), Session::new())
        .unwrap_err();
    assert!(matches!(err, HandlerError::Unauthorized(_)));
    assert_eq!(err.status_code(), 401);
}

#[test]
fn anonymous_malformed_input_is_unauthorized() {
    let err = service()
        .dispatch("miv.issue", json!({ "residenceId": "res-1", "items": [] }), Session::new())
        .unwrap_err();
    assert_eq!(err.status_code(), 401);
}

#[test]
fn oversized_quantity_is_a_bad_request() {
    let service = service();
    let err = service
        .dispatch(
            "mrv.receive",
            json!({
                "residenceId": "res-1",
                "items": [
                    { "itemId": "itm-filter", "quantity": i64::MAX },
                    { "itemId": "itm-filter", "quantity": i64::MAX }
                ]
            }),
            staff(),
        )
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(stock(&service, "itm-filter", "res-1"), 10);
}

#[test]
fn unassigned_residence_is_forbidden() {
    let session = Session::for_user("staff-2", "staff", &["res-2"]);
    let err = service().dispatch("miv.issue", issue(1), session).unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[test]
fn unknown_role_is_forbidden() {
    let session = Session::for_user("someone", "owner", &["res-1"]);
    let err = service().dispatch("miv.issue", issue(1), session).unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[test]
fn malformed_input_fails_the_guard() {
    let err = service()
        .dispatch("miv.issue", json!({ "residenceId": "res-1", "items": [] }), staff())
        .unwrap_err();
    assert!(matches!(err, HandlerError::GuardRejected(_)));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn insufficient_stock_is_a_bad_request() {
    let service = service();
    let err = service.dispatch("miv.issue", issue(15), staff()).unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(err.to_string().contains("insufficient stock"));
    assert_eq!(stock(&service, "itm-filter", "res-1"), 10);
}

#[test]
fn request_approve_and_double_approve() {
    let service = service();
    let created = service
        .dispatch(
            "mrv.request",
            json!({
                "residenceId": "res-1",
                "items": [{ "itemId": "itm-filter", "quantity": 5 }],
                "meta": { "supplierName": "Gulf Supplies" }
            }),
            staff(),
        )
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let denied = service
        .dispatch("mrv.approve", json!({ "id": id }), staff())
        .unwrap_err();
    assert_eq!(denied.status_code(), 403);

    let approved = service
        .dispatch("mrv.approve", json!({ "id": id }), manager())
        .unwrap();
    assert_eq!(approved["status"], "completed");
    assert_eq!(approved["approvedBy"], "manager-1");
    assert_eq!(stock(&service, "itm-filter", "res-1"), 15);

    let again = service
        .dispatch("mrv.approve", json!({ "id": id }), manager())
        .unwrap_err();
    assert!(matches!(again, HandlerError::Conflict(_)));
    assert_eq!(again.status_code(), 409);
}

#[test]
fn unknown_document_is_not_found() {
    let err = service()
        .dispatch("transfer.approve", json!({ "id": "TRF-25-08-999" }), manager())
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[test]
fn unknown_command_is_not_found() {
    let err = service()
        .dispatch("miv.cancel", json!({}), staff())
        .unwrap_err();
    assert!(matches!(err, HandlerError::UnknownCommand(_)));
}

#[test]
fn admin_commands_reject_other_roles() {
    let service = service();
    let err = service
        .dispatch("stock.repair-negative", json!({}), manager())
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let report = service
        .dispatch("stock.repair-negative", json!({}), admin())
        .unwrap();
    assert_eq!(report["entriesFixed"], 0);
    assert_eq!(report["itemsScanned"], 1);
}

#[test]
fn dispatch_request_carries_status_and_error() {
    let mut session_variables = HashMap::new();
    session_variables.insert("X-User-Id".to_string(), "staff-1".to_string());
    session_variables.insert("X-User-Role".to_string(), "staff".to_string());
    session_variables.insert("X-User-Residences".to_string(), "res-1".to_string());

    let service = service();
    let ok = service.dispatch_request(&CommandRequest {
        command: "miv.issue".into(),
        input: issue(2),
        session_variables: session_variables.clone(),
    });
    assert_eq!(ok.status, 200);
    assert_eq!(ok.body["short"], "MIV-25081");

    let failed = service.dispatch_request(&CommandRequest {
        command: "miv.issue".into(),
        input: issue(50),
        session_variables,
    });
    assert_eq!(failed.status, 400);
    assert!(failed.body["error"].is_string());
}
