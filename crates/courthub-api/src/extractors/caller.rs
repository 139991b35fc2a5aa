//! `Caller` extractor: turns the gateway identity headers into a
//! `RequestContext`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use courthub_core::error::AppError;
use courthub_core::types::id::UserId;
use courthub_service::{CallerRole, RequestContext};

use crate::error::ApiError;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Identified caller context available in handlers.
#[derive(Debug, Clone)]
pub struct Caller(pub RequestContext);

impl std::ops::Deref for Caller {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER)
            .map(|raw| {
                Uuid::parse_str(raw)
                    .map(UserId::from_uuid)
                    .map_err(|_| AppError::authentication(format!("Invalid {USER_ID_HEADER} header")))
            })
            .transpose()?;

        let role = match header(parts, USER_ROLE_HEADER).map(str::to_ascii_lowercase).as_deref() {
            None | Some("customer") => CallerRole::Customer,
            Some("admin") => CallerRole::Admin,
            Some(other) => {
                return Err(AppError::authentication(format!("Unknown caller role '{other}'")).into());
            }
        };

        let ctx = match role {
            CallerRole::Admin => RequestContext::admin(user_id),
            CallerRole::Customer => match user_id {
                Some(id) => RequestContext::customer(id),
                None => RequestContext::anonymous(),
            },
        };
        Ok(Caller(ctx))
    }
}
