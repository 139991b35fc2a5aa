//! Request context carrying the caller identity and the request clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use courthub_core::error::AppError;
use courthub_core::types::id::UserId;

/// Role the upstream gateway assigned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallerRole {
    /// End user booking through the online flow.
    Customer,
    /// Venue administrator creating manual bookings.
    Admin,
}

/// Context for the current request.
///
/// Built by the API layer and passed explicitly into every service call.
/// `request_time` is the single notion of "now" for the whole request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The caller, if identified.
    pub user_id: Option<UserId>,
    /// The caller's role.
    pub role: CallerRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Context for an identified customer.
    pub fn customer(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            role: CallerRole::Customer,
            request_time: Utc::now(),
        }
    }

    /// Context for an administrator.
    pub fn admin(user_id: Option<UserId>) -> Self {
        Self {
            user_id,
            role: CallerRole::Admin,
            request_time: Utc::now(),
        }
    }

    /// Context for an unidentified caller (availability browsing).
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            role: CallerRole::Customer,
            request_time: Utc::now(),
        }
    }

    /// Pin the request clock.
    pub fn at(mut self, request_time: DateTime<Utc>) -> Self {
        self.request_time = request_time;
        self
    }

    /// Returns whether the caller is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == CallerRole::Admin
    }

    /// The caller's user id, or an authentication error.
    pub fn require_user(&self) -> Result<UserId, AppError> {
        self.user_id
            .ok_or_else(|| AppError::authentication("A user identity is required"))
    }
}
