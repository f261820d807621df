//! Content Error Types

use thiserror::Error;

use crate::access::AccessError;
use crate::db::{ContentKind, StoreError};
use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum ContentError {
    /// Absent, or unpublished and the caller may not see it.
    #[error("{} not found", .0.label())]
    NotFound(ContentKind),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::NotFound(_) => Self::not_found(err.to_string()),
            ContentError::Access(e) => e.into(),
            ContentError::Store(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use wiki_common::ErrorKind;

    use super::*;

    #[test]
    fn test_not_found_names_kind() {
        let err = ApiError::from(ContentError::NotFound(ContentKind::Guide));
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Guide not found");
    }
}
