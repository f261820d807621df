//! Permission vocabulary.
//!
//! Two gates coexist:
//! - Named roles: route classes such as "admin or above"
//! - Capabilities: dotted keys read from the role's permission document
//!
//! Both are expressed as a [`Requirement`] and evaluated by the access guard.

pub mod capability;
pub mod requirement;

pub use capability::{Capabilities, Capability, ContentOp};
pub use requirement::Requirement;
