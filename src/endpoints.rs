//! The API endpoints URIs.

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route that loads the seed data into the database.
pub const SEED: &str = "/api/seed";
/// The route to search transactions one page at a time.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to list every transaction.
pub const ALL_TRANSACTIONS: &str = "/api/transactions/all";
/// The route for the sales totals of a month.
pub const STATISTICS: &str = "/api/statistics";
/// The route for the price histogram of a month.
pub const BAR_CHART: &str = "/api/bar-chart";
/// The route for the category breakdown of a month.
pub const PIE_CHART: &str = "/api/pie-chart";
/// The route for the statistics, price histogram and category breakdown of a month.
pub const COMBINED: &str = "/api/combined";

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::COFFEE);
        assert_endpoint_is_valid_uri(endpoints::SEED);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::ALL_TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::STATISTICS);
        assert_endpoint_is_valid_uri(endpoints::BAR_CHART);
        assert_endpoint_is_valid_uri(endpoints::PIE_CHART);
        assert_endpoint_is_valid_uri(endpoints::COMBINED);
    }
}
