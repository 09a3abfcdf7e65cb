//! Error codes for the trxscope backend.

pub mod error_code;

pub use error_code::ErrorCode;
