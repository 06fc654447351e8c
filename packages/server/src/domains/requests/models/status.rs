use serde::{Deserialize, Serialize};

use crate::common::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    Return,
    Replacement,
}

impl RequestKind {
    /// Plural form used in queue paths (`/api/admin/requests/returns`)
    pub fn queue_name(self) -> &'static str {
        match self {
            RequestKind::Return => "returns",
            RequestKind::Replacement => "replacements",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestKind::Return => write!(f, "Return"),
            RequestKind::Replacement => write!(f, "Replacement"),
        }
    }
}

impl std::str::FromStr for RequestKind {
    type Err = anyhow::Error;

    /// Accepts both the singular kind and the plural queue name
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "return" | "returns" => Ok(RequestKind::Return),
            "replacement" | "replacements" => Ok(RequestKind::Replacement),
            _ => Err(anyhow::anyhow!("Invalid request kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl RequestStatus {
    /// Approved requests are completed once the return or replacement ships.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        use RequestStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Completed)
        )
    }

    pub fn transition(self, next: RequestStatus) -> ServiceResult<RequestStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ServiceError::invalid_transition(self, next))
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "Pending"),
            RequestStatus::Approved => write!(f, "Approved"),
            RequestStatus::Rejected => write!(f, "Rejected"),
            RequestStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            "completed" => Ok(RequestStatus::Completed),
            _ => Err(anyhow::anyhow!("Invalid request status: {}", s)),
        }
    }
}
