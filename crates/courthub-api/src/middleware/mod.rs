//! HTTP middleware: CORS, compression, and request logging.

pub mod compression;
pub mod cors;
pub mod logging;
