//! Booking entity, status machine, and payment enums.

pub mod model;
pub mod status;

pub use model::{Booking, NewBooking};
pub use status::{BookingStatus, PaymentMode, PaymentProgress};
