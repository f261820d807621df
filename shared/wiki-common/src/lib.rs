//! Game Wiki Common Library
//!
//! Wire types shared by the server and API clients: the response envelope,
//! the error taxonomy and the well-known role names.

pub mod error;
pub mod types;

pub use error::{ErrorBody, ErrorKind};
pub use types::*;
