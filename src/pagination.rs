//! This modules defines the common functionality for paging data.

use serde::{Deserialize, Serialize};

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of items to return per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a client may ask for.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// A validated request for one page of data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// The one-based page number.
    pub page: u64,
    /// The maximum number of items on a page.
    pub per_page: u64,
}

impl PageRequest {
    /// Parse the raw `page` and `perPage` query parameters, falling back to
    /// the defaults in `config` for missing or blank values.
    ///
    /// # Errors
    /// Returns [Error::InvalidPagination] if a value is not a positive integer,
    /// or if `per_page` is larger than [PaginationConfig::max_page_size].
    pub fn parse(
        page: Option<&str>,
        per_page: Option<&str>,
        config: &PaginationConfig,
    ) -> Result<Self, Error> {
        let page = parse_positive("page", page)?.unwrap_or(config.default_page);
        let per_page = parse_positive("perPage", per_page)?.unwrap_or(config.default_page_size);

        if per_page > config.max_page_size {
            return Err(Error::InvalidPagination(format!(
                "perPage must be at most {}, got {per_page}",
                config.max_page_size
            )));
        }

        Ok(Self { page, per_page })
    }

    /// The number of items before the first item on this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

fn parse_positive(name: &str, value: Option<&str>) -> Result<Option<u64>, Error> {
    let value = match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value,
        None => return Ok(None),
    };

    match value.parse::<u64>() {
        Ok(number) if number >= 1 => Ok(Some(number)),
        _ => Err(Error::InvalidPagination(format!(
            "{name} must be a positive integer, got \"{value}\""
        ))),
    }
}

/// The pagination details sent alongside a page of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// The one-based page number.
    pub page: u64,
    /// The maximum number of items on a page.
    pub per_page: u64,
    /// The number of pages needed to hold every matching item.
    pub total_pages: u64,
    /// The number of matching items across every page.
    pub total_products: u64,
}

impl Pagination {
    /// Describe `request` for a result set of `total` items.
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            per_page: request.per_page,
            total_pages: total.div_ceil(request.per_page),
            total_products: total,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        pagination::{PageRequest, Pagination, PaginationConfig},
    };

    #[test]
    fn uses_defaults_when_missing() {
        let config = PaginationConfig::default();

        let got = PageRequest::parse(None, Some(""), &config);

        assert_eq!(
            got,
            Ok(PageRequest {
                page: 1,
                per_page: 10
            })
        );
    }

    #[test]
    fn parses_given_values() {
        let config = PaginationConfig::default();

        let got = PageRequest::parse(Some("3"), Some("25"), &config).unwrap();

        assert_eq!(got.page, 3);
        assert_eq!(got.per_page, 25);
        assert_eq!(got.offset(), 50);
    }

    #[test]
    fn rejects_zero_negative_and_non_numeric_values() {
        let config = PaginationConfig::default();

        for (page, per_page) in [
            (Some("0"), None),
            (None, Some("0")),
            (Some("-1"), None),
            (Some("two"), None),
            (None, Some("1.5")),
        ] {
            let got = PageRequest::parse(page, per_page, &config);

            assert!(
                matches!(got, Err(Error::InvalidPagination(_))),
                "want error for page={page:?}, perPage={per_page:?}, got {got:?}"
            );
        }
    }

    #[test]
    fn rejects_page_size_above_maximum() {
        let config = PaginationConfig {
            max_page_size: 50,
            ..Default::default()
        };

        let got = PageRequest::parse(None, Some("51"), &config);

        assert!(matches!(got, Err(Error::InvalidPagination(_))));
    }

    #[test]
    fn total_pages_rounds_up() {
        let request = PageRequest {
            page: 1,
            per_page: 10,
        };

        assert_eq!(Pagination::new(request, 0).total_pages, 0);
        assert_eq!(Pagination::new(request, 10).total_pages, 1);
        assert_eq!(Pagination::new(request, 11).total_pages, 2);
    }

    #[test]
    fn serializes_with_camel_case_names() {
        let pagination = Pagination::new(
            PageRequest {
                page: 2,
                per_page: 5,
            },
            12,
        );

        let json = serde_json::to_value(pagination).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "page": 2,
                "perPage": 5,
                "totalPages": 3,
                "totalProducts": 12,
            })
        );
    }
}
