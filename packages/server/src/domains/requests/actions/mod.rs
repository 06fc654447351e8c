//! Request actions - customer submissions and the admin returns/replacements queues

use tracing::{debug, error, info, warn};

use crate::common::{
    run_list_query, Actor, AdminCapability, AuthError, ListQuery, MemberId, Page, RequestId,
    ServiceError, ServiceResult,
};
use crate::domains::requests::models::{
    NewServiceRequest, RequestKind, RequestStatus, ServiceRequest, ServiceRequestListing,
};
use crate::kernel::ServerDeps;

/// Attempts before giving up on a request that keeps changing under us
const MAX_ATTEMPTS: usize = 3;

/// File a return or replacement request for the calling customer
pub async fn submit_request(
    input: NewServiceRequest,
    actor: Option<&Actor>,
    deps: &ServerDeps,
) -> ServiceResult<ServiceRequest> {
    let actor = actor.ok_or(AuthError::AuthenticationRequired)?;

    let request = ServiceRequest::create(actor.member_id(), input, deps.store()).await?;

    info!(
        request_id = %request.id,
        kind = %request.kind,
        order_number = %request.order_number,
        customer_id = %request.customer,
        "Service request submitted"
    );
    Ok(request)
}

/// One admin queue (returns or replacements), filtered and paged
pub async fn list_queue(
    kind: RequestKind,
    query: &ListQuery<RequestStatus>,
    actor: &Actor,
    deps: &ServerDeps,
) -> ServiceResult<Page<ServiceRequestListing>> {
    actor.can(AdminCapability::ManageRequests).check()?;

    let requests = ServiceRequest::find_by_kind(kind, deps.store()).await?;
    let customer_ids: Vec<MemberId> = requests.iter().map(|r| r.customer).collect();
    let customers = deps.catalog.member_summaries(&customer_ids).await?;

    let rows = requests
        .into_iter()
        .map(|request| {
            let name = customers.get(&request.customer).map(|m| m.name.clone());
            ServiceRequestListing::new(request, name)
        })
        .collect();

    let page = run_list_query(rows, query);
    debug!(
        queue = kind.queue_name(),
        total = page.total_items,
        member_id = %actor.member_id(),
        "Request queue listed"
    );
    Ok(page)
}

/// Advance a request through its status machine (admin only)
///
/// Like review moderation, the write is conditional on the request being
/// unchanged since it was read; a losing writer re-reads and re-checks.
pub async fn set_request_status(
    id: RequestId,
    status: RequestStatus,
    actor: &Actor,
    deps: &ServerDeps,
) -> ServiceResult<ServiceRequest> {
    actor.can(AdminCapability::ManageRequests).check()?;

    for attempt in 1..=MAX_ATTEMPTS {
        let request = ServiceRequest::find_by_id(id, deps.store())
            .await?
            .ok_or_else(|| ServiceError::not_found("ServiceRequest", id))?;
        let previous = request.status;

        let updated = request
            .set_status(status, deps.store())
            .await
            .inspect_err(|e| {
                if matches!(e, ServiceError::InvalidTransition { .. }) {
                    warn!(request_id = %id, from = %previous, to = %status, "Rejected request status transition");
                }
            })?;

        if let Some(updated) = updated {
            info!(
                request_id = %id,
                from = %previous,
                to = %updated.status,
                member_id = %actor.member_id(),
                "Service request status changed"
            );
            return Ok(updated);
        }
        warn!(request_id = %id, attempt, "Service request changed during status update, retrying");
    }

    error!(request_id = %id, attempts = MAX_ATTEMPTS, "Service request status update did not settle");
    Err(ServiceError::Integrity(format!(
        "service request {id} changed concurrently on every attempt"
    )))
}
