use super::{AdminCapability, AuthError};
use crate::common::entity_ids::MemberId;

/// The acting principal, as established by the authentication layer
///
/// Usage:
/// ```rust,ignore
/// actor
///     .can(AdminCapability::ManageContent)
///     .check()?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    member_id: MemberId,
    is_admin: bool,
}

impl Actor {
    /// # Arguments
    /// * `member_id` - The member ID of the actor
    /// * `is_admin` - Admin flag from the verified JWT
    pub fn new(member_id: MemberId, is_admin: bool) -> Self {
        Self {
            member_id,
            is_admin,
        }
    }

    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Specify what capability the actor needs
    pub fn can(&self, capability: AdminCapability) -> CapabilityBuilder {
        CapabilityBuilder {
            actor: *self,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder {
    actor: Actor,
    capability: AdminCapability,
}

impl CapabilityBuilder {
    /// Perform the authorization check
    ///
    /// Every admin capability requires the admin flag; the flag was set when
    /// the token was issued and is trusted for the token's lifetime.
    pub fn check(self) -> Result<Actor, AuthError> {
        if !self.actor.is_admin {
            tracing::warn!(
                member_id = %self.actor.member_id,
                capability = %self.capability,
                "Authorization denied"
            );
            return Err(AuthError::AdminRequired(self.capability));
        }

        Ok(self.actor)
    }
}
