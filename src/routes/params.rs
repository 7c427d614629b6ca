use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Query string shared by every list endpoint.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number, default 1
    pub page: Option<u64>,
    /// Items per page, default 10, at most 100
    pub limit: Option<u64>,
    /// Case-insensitive search term
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: u64,
    pub limit: u64,
    pub search: String,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: String::new(),
        }
    }
}

impl ListQuery {
    pub fn normalize(self) -> ListParams {
        ListParams {
            page: self.page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            search: self.search.map(|s| s.trim().to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    /// Only courses in this category
    pub category_id: Option<Uuid>,
}

impl CourseQuery {
    pub fn normalize(self) -> (ListParams, Option<Uuid>) {
        let params = ListQuery {
            page: self.page,
            limit: self.limit,
            search: self.search,
        }
        .normalize();
        (params, self.category_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        assert_eq!(ListQuery::default().normalize(), ListParams::default());
    }

    #[test]
    fn limit_and_page_are_clamped() {
        let params = ListQuery {
            page: Some(0),
            limit: Some(500),
            search: Some("  rust ".into()),
        }
        .normalize();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, MAX_LIMIT);
        assert_eq!(params.search, "rust");
    }
}
