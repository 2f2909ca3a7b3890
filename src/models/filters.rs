// src/models/filters.rs

use serde::Serialize;

use crate::utils::validator::{Validator, permitted_value};

pub const MAX_PAGE: i64 = 500;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Sort keys accepted when listing comments.
pub const COMMENT_SORT_SAFE_LIST: &[&str] = &["id", "content", "author", "-id", "-content", "-author"];

/// Pagination and sorting requested by a client. Untrusted until validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    pub sort: String,
    pub sort_safe_list: &'static [&'static str],
}

/// Pagination checks. `sort` must match a safe-list entry exactly, sign included.
pub fn validate_filters(v: &mut Validator, f: &Filters) {
    v.check(f.page > 0, "page", "must be greater than zero");
    v.check(f.page <= MAX_PAGE, "page", "must be a maximum of 500");
    v.check(f.page_size > 0, "page_size", "must be greater than zero");
    v.check(f.page_size <= MAX_PAGE_SIZE, "page_size", "must be a maximum of 100");
    v.check(
        permitted_value(f.sort.as_str(), f.sort_safe_list),
        "sort",
        "invalid sort value",
    );
}

impl Filters {
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// Runs [`validate_filters`] and hands back the validated form only when
    /// `v` holds no failures afterwards (including ones recorded earlier).
    pub fn validate(self, v: &mut Validator) -> Option<ValidatedFilters> {
        validate_filters(v, &self);
        if !v.is_empty() {
            return None;
        }
        let order = self.sort_order()?;
        Some(ValidatedFilters {
            filters: self,
            order,
        })
    }

    /// Resolves `sort` against the safe list. The returned column token is
    /// borrowed from the static list, never from client input.
    fn sort_order(&self) -> Option<SortOrder> {
        let entry = self
            .sort_safe_list
            .iter()
            .copied()
            .find(|safe| *safe == self.sort)?;

        Some(match entry.strip_prefix('-') {
            Some(column) => SortOrder {
                column,
                direction: SortDirection::Desc,
            },
            None => SortOrder {
                column: entry,
                direction: SortDirection::Asc,
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SortOrder {
    column: &'static str,
    direction: SortDirection,
}

/// Filters that passed validation. Only obtainable through
/// [`Filters::validate`], so the sort accessors never see unchecked input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFilters {
    filters: Filters,
    order: SortOrder,
}

impl ValidatedFilters {
    pub fn page(&self) -> i64 {
        self.filters.page
    }

    pub fn page_size(&self) -> i64 {
        self.filters.page_size
    }

    pub fn limit(&self) -> i64 {
        self.filters.limit()
    }

    pub fn offset(&self) -> i64 {
        self.filters.offset()
    }

    pub fn sort_column(&self) -> &'static str {
        self.order.column
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.order.direction
    }
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

/// Pagination metadata returned alongside list results.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "is_zero")]
    pub current_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub page_size: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub first_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub last_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub total_records: i64,
}

/// Derives metadata from the total row count. An empty result yields the
/// zero value; `current_page` is echoed even when past `last_page`.
pub fn calculate_metadata(total_records: i64, current_page: i64, page_size: i64) -> Metadata {
    if total_records <= 0 || page_size <= 0 {
        return Metadata::default();
    }

    Metadata {
        current_page,
        page_size,
        first_page: 1,
        last_page: (total_records + page_size - 1) / page_size,
        total_records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(page: i64, page_size: i64, sort: &str) -> Filters {
        Filters {
            page,
            page_size,
            sort: sort.to_string(),
            sort_safe_list: COMMENT_SORT_SAFE_LIST,
        }
    }

    fn failing_keys(f: &Filters) -> Vec<String> {
        let mut v = Validator::new();
        validate_filters(&mut v, f);
        v.into_errors().into_keys().collect()
    }

    #[test]
    fn valid_ranges_pass() {
        for (page, size) in [(1, 1), (1, 100), (500, 1), (500, 100), (42, 20)] {
            for sort in COMMENT_SORT_SAFE_LIST {
                assert!(failing_keys(&filters(page, size, sort)).is_empty());
            }
        }
    }

    #[test]
    fn out_of_range_reports_specific_keys() {
        assert_eq!(failing_keys(&filters(0, 10, "id")), vec!["page"]);
        assert_eq!(failing_keys(&filters(501, 10, "id")), vec!["page"]);
        assert_eq!(failing_keys(&filters(1, 0, "id")), vec!["page_size"]);
        assert_eq!(failing_keys(&filters(1, 101, "id")), vec!["page_size"]);
        assert_eq!(failing_keys(&filters(1, 10, "created_at")), vec!["sort"]);
        assert_eq!(
            failing_keys(&filters(-1, 1000, "ID")),
            vec!["page", "page_size", "sort"]
        );
    }

    #[test]
    fn sort_membership_is_exact() {
        assert_eq!(failing_keys(&filters(1, 10, "Author")), vec!["sort"]);
        assert_eq!(failing_keys(&filters(1, 10, "--id")), vec!["sort"]);
        assert_eq!(failing_keys(&filters(1, 10, "id; DROP TABLE comments")), vec!["sort"]);
    }

    #[test]
    fn limit_and_offset() {
        let f = filters(1, 10, "id");
        assert_eq!((f.limit(), f.offset()), (10, 0));

        let f = filters(3, 25, "id");
        assert_eq!((f.limit(), f.offset()), (25, 50));

        let f = filters(500, 100, "id");
        assert_eq!(f.offset(), 49_900);
    }

    #[test]
    fn validate_resolves_column_and_direction() {
        let mut v = Validator::new();
        let valid = filters(2, 5, "-author").validate(&mut v).unwrap();
        assert_eq!(valid.sort_column(), "author");
        assert_eq!(valid.sort_direction(), SortDirection::Desc);
        assert_eq!((valid.limit(), valid.offset()), (5, 5));

        let mut v = Validator::new();
        let valid = filters(1, 5, "content").validate(&mut v).unwrap();
        assert_eq!(valid.sort_column(), "content");
        assert_eq!(valid.sort_direction().as_sql(), "ASC");
    }

    #[test]
    fn validate_rejects_unsafe_sort() {
        let mut v = Validator::new();
        assert!(filters(1, 5, "id desc").validate(&mut v).is_none());
        assert_eq!(v.errors()["sort"], "invalid sort value");
    }

    #[test]
    fn validate_respects_earlier_failures() {
        let mut v = Validator::new();
        v.add_error("page", "must be an integer value");

        assert!(filters(1, 5, "id").validate(&mut v).is_none());
        assert_eq!(v.errors()["page"], "must be an integer value");
    }

    #[test]
    fn metadata_for_empty_result_is_zero() {
        for (page, size) in [(1, 10), (7, 3), (500, 100)] {
            assert_eq!(calculate_metadata(0, page, size), Metadata::default());
        }
        let json = serde_json::to_value(calculate_metadata(0, 1, 10)).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn metadata_last_page_rounds_up() {
        let m = calculate_metadata(3, 1, 10);
        assert_eq!(
            m,
            Metadata {
                current_page: 1,
                page_size: 10,
                first_page: 1,
                last_page: 1,
                total_records: 3,
            }
        );

        assert_eq!(calculate_metadata(10, 1, 10).last_page, 1);
        assert_eq!(calculate_metadata(11, 1, 10).last_page, 2);
        assert_eq!(calculate_metadata(1, 1, 1).last_page, 1);
    }

    #[test]
    fn metadata_does_not_clamp_current_page() {
        let m = calculate_metadata(5, 9, 2);
        assert_eq!(m.current_page, 9);
        assert_eq!(m.last_page, 3);
    }
}
