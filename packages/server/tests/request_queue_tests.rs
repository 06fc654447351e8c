//! Returns / replacements queue tests

mod common;

use crate::common::{seed_customer, LockstepStore, TestHarness};
use storefront_core::common::{Actor, ListQuery, RequestId, ServiceError, StatusFilter};
use storefront_core::domains::requests::actions::{list_queue, set_request_status, submit_request};
use storefront_core::domains::requests::{
    NewServiceRequest, RequestKind, RequestStatus, ServiceRequest,
};
use test_context::test_context;

fn input(kind: RequestKind, order_number: &str, reason: &str) -> NewServiceRequest {
    NewServiceRequest {
        kind,
        order_number: order_number.to_string(),
        product_id: None,
        reason: reason.to_string(),
        details: None,
    }
}

async fn file(
    ctx: &TestHarness,
    customer: &Actor,
    kind: RequestKind,
    order_number: &str,
    reason: &str,
) -> ServiceRequest {
    submit_request(input(kind, order_number, reason), Some(customer), &ctx.deps)
        .await
        .expect("Failed to submit request")
}

fn everything() -> ListQuery<RequestStatus> {
    ListQuery::new(StatusFilter::All, "", 1, 10)
}

#[test_context(TestHarness)]
#[tokio::test]
async fn queues_are_split_by_kind(ctx: &TestHarness) {
    let admin = ctx.admin();
    let customer = seed_customer(ctx, "Ada Lovelace").await;

    file(ctx, &customer, RequestKind::Return, "ORD-1", "Too small").await;
    file(ctx, &customer, RequestKind::Replacement, "ORD-2", "Arrived broken").await;
    file(ctx, &customer, RequestKind::Return, "ORD-3", "Changed my mind").await;

    let returns = list_queue(RequestKind::Return, &everything(), &admin, &ctx.deps)
        .await
        .unwrap();
    assert_eq!(returns.total_items, 2);
    assert_eq!(returns.items[0].request.order_number, "ORD-3");
    assert_eq!(returns.items[0].customer_name, "Ada Lovelace");

    let replacements = list_queue(RequestKind::Replacement, &everything(), &admin, &ctx.deps)
        .await
        .unwrap();
    assert_eq!(replacements.total_items, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn search_covers_customer_order_and_reason(ctx: &TestHarness) {
    let admin = ctx.admin();
    let ada = seed_customer(ctx, "Ada Lovelace").await;
    let grace = seed_customer(ctx, "Grace Hopper").await;

    file(ctx, &ada, RequestKind::Return, "ORD-100", "Wrong colour").await;
    let target = file(ctx, &grace, RequestKind::Return, "ORD-200", "Damaged seam").await;

    let target_id = target.id.to_string();
    for needle in ["hopper", "ord-200", "SEAM", target_id.as_str()] {
        let query = ListQuery::new(StatusFilter::All, needle, 1, 10);
        let page = list_queue(RequestKind::Return, &query, &admin, &ctx.deps)
            .await
            .unwrap();
        assert_eq!(page.total_items, 1, "search for {}", needle);
        assert_eq!(page.items[0].request.id, target.id);
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn status_machine_is_enforced(ctx: &TestHarness) {
    let admin = ctx.admin();
    let customer = ctx.shopper();
    let request = file(ctx, &customer, RequestKind::Replacement, "ORD-9", "Dead on arrival").await;
    assert_eq!(request.status, RequestStatus::Pending);

    let err = set_request_status(request.id, RequestStatus::Completed, &admin, &ctx.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition { .. }));

    let approved = set_request_status(request.id, RequestStatus::Approved, &admin, &ctx.deps)
        .await
        .unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);

    let completed = set_request_status(request.id, RequestStatus::Completed, &admin, &ctx.deps)
        .await
        .unwrap();
    assert_eq!(completed.status, RequestStatus::Completed);

    let query = ListQuery::new(StatusFilter::Only(RequestStatus::Completed), "", 1, 10);
    let page = list_queue(RequestKind::Replacement, &query, &admin, &ctx.deps)
        .await
        .unwrap();
    assert_eq!(page.total_items, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn racing_admins_cannot_both_decide(ctx: &TestHarness) {
    let customer = seed_customer(ctx, "Ada").await;
    let request = file(ctx, &customer, RequestKind::Return, "A-1001", "Too small").await;
    let admin = ctx.admin();

    let deps = LockstepStore::deps(ctx.store.clone(), &ctx.deps);
    let (approve, reject) = tokio::join!(
        set_request_status(request.id, RequestStatus::Approved, &admin, &deps),
        set_request_status(request.id, RequestStatus::Rejected, &admin, &deps),
    );

    let (winner, loser) = match (approve, reject) {
        (Ok(saved), Err(err)) | (Err(err), Ok(saved)) => (saved, err),
        (a, b) => panic!("expected exactly one decision to land, got {:?} and {:?}", a, b),
    };
    assert!(matches!(loser, ServiceError::InvalidTransition { .. }));

    let page = list_queue(RequestKind::Return, &everything(), &admin, &ctx.deps)
        .await
        .unwrap();
    assert_eq!(page.items[0].request.status, winner.status);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_request_is_not_found(ctx: &TestHarness) {
    let err = set_request_status(RequestId::new(), RequestStatus::Approved, &ctx.admin(), &ctx.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn submission_requires_order_number_and_sign_in(ctx: &TestHarness) {
    let customer = ctx.shopper();

    let err = submit_request(input(RequestKind::Return, " ", "Too big"), Some(&customer), &ctx.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation { ref field, .. } if field == "orderNumber"));

    let err = submit_request(input(RequestKind::Return, "ORD-1", "Too big"), None, &ctx.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn queue_requires_capability(ctx: &TestHarness) {
    let err = list_queue(RequestKind::Return, &everything(), &ctx.shopper(), &ctx.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));
}
