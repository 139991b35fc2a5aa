//! Request DTOs with validation.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use courthub_core::error::AppError;
use courthub_core::types::id::ServiceId;
use courthub_entity::booking::PaymentMode;
use courthub_service::{CancelRequest, CreateBookingRequest, SoftLockRequest};

/// Run derived validation, mapping failures to a validation error.
pub fn validate<T: Validate>(req: &T) -> Result<(), AppError> {
    req.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))
}

/// Availability query string.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AvailabilityQuery {
    /// Activity code, case-insensitive.
    #[validate(length(min = 1, max = 64, message = "Activity is required"))]
    pub activity: String,
    /// Day to quote.
    pub date: NaiveDate,
}

/// `POST /api/bookings` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingBody {
    /// Slot keys from an availability listing.
    #[validate(length(min = 1, message = "At least one slot key is required"))]
    pub slot_keys: Vec<String>,
    /// How the customer pays.
    #[serde(default, alias = "payment_mode")]
    pub payment_method: PaymentMode,
    /// Retry-safety key.
    #[validate(length(min = 1, max = 128))]
    pub idempotency_key: Option<String>,
    /// Accept one booking per sub-slot.
    #[serde(default)]
    pub allow_split: bool,
}

impl From<CreateBookingBody> for CreateBookingRequest {
    fn from(body: CreateBookingBody) -> Self {
        Self {
            slot_keys: body.slot_keys,
            payment_mode: body.payment_method,
            idempotency_key: body.idempotency_key,
            allow_split: body.allow_split,
        }
    }
}

/// `POST /api/bookings/soft-lock` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SoftLockBody {
    /// Owning service.
    pub service_id: ServiceId,
    /// Activity code.
    #[validate(length(min = 1, max = 64))]
    pub activity_code: String,
    /// Day of play.
    pub date: NaiveDate,
    /// Range start.
    pub start_time: NaiveTime,
    /// Range end.
    pub end_time: NaiveTime,
    /// Client retry token.
    #[validate(length(min = 1, max = 128))]
    pub client_request_id: Option<String>,
    /// How the customer pays.
    #[serde(default, alias = "payment_mode")]
    pub payment_method: PaymentMode,
}

impl From<SoftLockBody> for SoftLockRequest {
    fn from(body: SoftLockBody) -> Self {
        Self {
            service_id: body.service_id,
            activity_code: body.activity_code,
            date: body.date,
            start_time: body.start_time,
            end_time: body.end_time,
            client_request_id: body.client_request_id,
            payment_mode: body.payment_method,
        }
    }
}

/// `POST /api/bookings/{id}/cancel` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CancelBody {
    /// Free-text reason.
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

impl From<CancelBody> for CancelRequest {
    fn from(body: CancelBody) -> Self {
        Self {
            reason: body.reason,
        }
    }
}
