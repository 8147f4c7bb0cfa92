//! Runtime settings shared by the request handlers.

use std::time::Duration;

use crate::pagination::PaginationConfig;

/// The default upper bound on how long a request may take before it is aborted.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The default upper bound on how long a single SQL statement may run.
pub const DEFAULT_SQL_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings that control how the server answers requests.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The config that controls how pages of transactions are returned.
    pub pagination: PaginationConfig,
    /// Requests that take longer than this are aborted.
    pub request_timeout: Duration,
    /// SQL statements that run longer than this are interrupted.
    pub sql_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pagination: PaginationConfig::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            sql_timeout: DEFAULT_SQL_TIMEOUT,
        }
    }
}
