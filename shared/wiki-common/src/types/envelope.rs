//! Response Envelope
//!
//! Every API response is wrapped in one of two shapes:
//! - success: `{ "success": true, "data": ..., "pagination": {...}? }`
//! - failure: `{ "success": false, "error": { "code", "message", "details"? } }`

use serde::{Deserialize, Serialize};

use crate::error::ErrorBody;

/// Success envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Response payload.
    pub data: T,
    /// Present on list endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// Wrap a single payload.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
        }
    }

    /// Wrap one page of a listing.
    #[must_use]
    pub const fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            data,
            pagination: Some(pagination),
        }
    }
}

/// Failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always `false`.
    pub success: bool,
    pub error: ErrorBody,
}

impl ErrorEnvelope {
    #[must_use]
    pub const fn new(error: ErrorBody) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

/// Pagination block for list responses. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    /// Build the block from the requested page, page size and total row count.
    ///
    /// ```
    /// use wiki_common::Pagination;
    ///
    /// let p = Pagination::new(2, 20, 41);
    /// assert_eq!(p.pages, 3);
    /// ```
    #[must_use]
    pub const fn new(page: u32, limit: u32, total: u64) -> Self {
        let pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit as u64)
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_ok_envelope_omits_pagination() {
        let json = serde_json::to_value(ApiResponse::ok(serde_json::json!({"id": 1}))).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": {"id": 1}}));
    }

    #[test]
    fn test_paginated_envelope() {
        let json =
            serde_json::to_value(ApiResponse::paginated(vec![1, 2], Pagination::new(1, 2, 5)))
                .unwrap();
        assert_eq!(json["pagination"]["pages"], 3);
        assert_eq!(json["pagination"]["total"], 5);
    }

    #[test]
    fn test_pages_rounding() {
        assert_eq!(Pagination::new(1, 20, 0).pages, 0);
        assert_eq!(Pagination::new(1, 20, 20).pages, 1);
        assert_eq!(Pagination::new(1, 20, 21).pages, 2);
        assert_eq!(Pagination::new(1, 0, 21).pages, 0);
    }

    #[test]
    fn test_error_envelope_shape() {
        let envelope = ErrorEnvelope::new(ErrorBody {
            code: ErrorKind::Forbidden,
            message: "Founder role required".into(),
            details: None,
        });
        let json = serde_json::to_value(envelope).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "FORBIDDEN");
    }
}
