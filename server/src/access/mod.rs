//! Access Guard
//!
//! Resolves who is calling and decides, before any mutation, whether they
//! may proceed.

mod actor;
mod error;
pub mod guard;
mod middleware;

pub use actor::{Actor, Viewer};
pub use error::AccessError;
pub use middleware::{require, resolve_actor};
