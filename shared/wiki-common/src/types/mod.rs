//! Shared API Types

pub mod envelope;
pub mod role;

pub use envelope::{ApiResponse, ErrorEnvelope, Pagination};
pub use role::{RoleName, UnknownRole};
