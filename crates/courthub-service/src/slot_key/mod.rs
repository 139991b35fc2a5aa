//! Tamper-proof, time-boxed slot quotes.

pub mod codec;
pub mod payload;

pub use codec::SlotKeyCodec;
pub use payload::{SlotKeyPayload, slot_group_id};
