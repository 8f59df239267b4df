//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};

use stride_core::types::pagination::PageRequest;

/// Query parameters for paginated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default: 20, max: 100).
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    20
}

impl PaginationParams {
    /// Converts to a `PageRequest`, clamping out-of-range values.
    pub fn into_page_request(self) -> PageRequest {
        PageRequest {
            page: self.page.max(1),
            page_size: self.limit.clamp(1, 100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        let page = params.into_page_request();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 20);
    }

    #[test]
    fn limit_is_clamped() {
        let params = PaginationParams {
            page: 0,
            limit: 5000,
        };
        let page = params.into_page_request();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 100);
    }
}
