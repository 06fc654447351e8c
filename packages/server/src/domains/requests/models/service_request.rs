use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{RequestKind, RequestStatus};
use crate::common::{Listable, MemberId, ProductId, RequestId, ServiceError, ServiceResult};
use crate::kernel::{BaseDocumentStore, StoreError, StoredDocument};

pub const REQUEST_COLLECTION: &str = "service_requests";

/// ServiceRequest - a customer asking to return or replace part of an order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: RequestId,
    pub kind: RequestKind,
    pub order_number: String,
    pub customer: MemberId,
    pub product_id: Option<ProductId>,
    pub reason: String,
    pub details: Option<String>,
    pub status: RequestStatus,
    pub requested_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewServiceRequest {
    pub kind: RequestKind,
    #[serde(default)]
    pub order_number: String,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub details: Option<String>,
}

impl NewServiceRequest {
    fn validate(self) -> ServiceResult<Self> {
        let order_number = self.order_number.trim().to_string();
        if order_number.is_empty() {
            return Err(ServiceError::validation("orderNumber", "is required"));
        }
        let reason = self.reason.trim().to_string();
        if reason.is_empty() {
            return Err(ServiceError::validation("reason", "is required"));
        }

        Ok(NewServiceRequest {
            order_number,
            reason,
            details: self
                .details
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            ..self
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestBody {
    kind: RequestKind,
    order_number: String,
    customer: MemberId,
    #[serde(default)]
    product_id: Option<ProductId>,
    reason: String,
    #[serde(default)]
    details: Option<String>,
    status: RequestStatus,
}

// =============================================================================
// Store access - ALL request queries live here
// =============================================================================

impl ServiceRequest {
    fn from_document(doc: StoredDocument) -> ServiceResult<Self> {
        let body: RequestBody = doc.decode()?;
        Ok(ServiceRequest {
            id: RequestId::from_uuid(doc.id),
            kind: body.kind,
            order_number: body.order_number,
            customer: body.customer,
            product_id: body.product_id,
            reason: body.reason,
            details: body.details,
            status: body.status,
            requested_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }

    pub async fn create(
        customer: MemberId,
        input: NewServiceRequest,
        store: &dyn BaseDocumentStore,
    ) -> ServiceResult<Self> {
        let input = input.validate()?;
        let body = RequestBody {
            kind: input.kind,
            order_number: input.order_number,
            customer,
            product_id: input.product_id,
            reason: input.reason,
            details: input.details,
            status: RequestStatus::Pending,
        };
        let body = serde_json::to_value(&body).map_err(StoreError::from)?;
        let doc = store.insert(REQUEST_COLLECTION, None, body).await?;
        Self::from_document(doc)
    }

    pub async fn find_by_id(
        id: RequestId,
        store: &dyn BaseDocumentStore,
    ) -> ServiceResult<Option<Self>> {
        store
            .find_by_id(REQUEST_COLLECTION, id.into_uuid())
            .await?
            .map(Self::from_document)
            .transpose()
    }

    pub async fn find_by_kind(
        kind: RequestKind,
        store: &dyn BaseDocumentStore,
    ) -> ServiceResult<Vec<Self>> {
        let mut requests = Vec::new();
        for doc in store.find_all(REQUEST_COLLECTION).await? {
            let request = Self::from_document(doc)?;
            if request.kind == kind {
                requests.push(request);
            }
        }
        Ok(requests)
    }

    /// Move to `next` and persist, provided the stored request is unchanged
    /// since this value was loaded. `Ok(None)` when it changed or vanished.
    pub async fn set_status(
        self,
        next: RequestStatus,
        store: &dyn BaseDocumentStore,
    ) -> ServiceResult<Option<Self>> {
        let body = RequestBody {
            kind: self.kind,
            order_number: self.order_number,
            customer: self.customer,
            product_id: self.product_id,
            reason: self.reason,
            details: self.details,
            status: self.status.transition(next)?,
        };
        let body = serde_json::to_value(&body).map_err(StoreError::from)?;
        store
            .update_if(REQUEST_COLLECTION, self.id.into_uuid(), self.updated_at, body)
            .await?
            .map(Self::from_document)
            .transpose()
    }
}

/// A request as its admin queue shows it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestListing {
    #[serde(flatten)]
    pub request: ServiceRequest,
    pub customer_name: String,
    #[serde(skip)]
    id_text: String,
}

impl ServiceRequestListing {
    pub fn new(request: ServiceRequest, customer_name: Option<String>) -> Self {
        let id_text = request.id.to_string();
        Self {
            request,
            customer_name: customer_name.unwrap_or_else(|| "Unknown customer".to_string()),
            id_text,
        }
    }
}

impl Listable for ServiceRequestListing {
    type Status = RequestStatus;

    fn status(&self) -> &RequestStatus {
        &self.request.status
    }

    fn listed_at(&self) -> DateTime<Utc> {
        self.request.requested_at
    }

    fn tie_breaker(&self) -> Uuid {
        self.request.id.into_uuid()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.customer_name.as_str(),
            self.request.order_number.as_str(),
            self.id_text.as_str(),
            self.request.reason.as_str(),
        ]
    }
}
