//! A REST API for browsing a product sales dataset.
//!
//! The server seeds a SQLite database with product transactions fetched from a
//! remote JSON document and answers read queries over it: a paginated search
//! and three monthly dashboard aggregations (sales statistics, a price
//! histogram and a category breakdown).

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod config;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod month;
mod not_found;
mod pagination;
mod routing;
mod seed;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use config::AppConfig;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::MonthSelector;
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use seed::{
    DEFAULT_SEED_URL, FileSeedSource, HttpSeedSource, SeedSource, seed_transactions,
};
pub use transaction::{NewTransaction, Transaction, count_transactions};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The month query parameter could not be interpreted as a month.
    ///
    /// Holds the raw value supplied by the client.
    #[error(
        "invalid month \"{0}\": expected a month name (e.g. \"March\"), \
        a month number from 1 to 12, or a year and month (e.g. \"2022-03\")"
    )]
    InvalidMonth(String),

    /// An endpoint that aggregates by month was called without a month.
    #[error("the month query parameter is required")]
    MissingMonth,

    /// The `page` or `perPage` query parameters are not valid.
    #[error("invalid pagination parameters: {0}")]
    InvalidPagination(String),

    /// The seed data could not be retrieved from its source.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not fetch seed data: {0}")]
    SeedFetch(String),

    /// The seed data was retrieved but does not describe valid transactions.
    #[error("invalid seed data: {0}")]
    InvalidSeedData(String),

    /// The seed data was valid but could not be written to the database.
    #[error("could not insert seed data: {0}")]
    SeedInsert(String),

    /// A database query ran past its deadline and was interrupted.
    #[error("the database query took too long and was interrupted")]
    QueryTimeout,

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A request or response body could not be read.
    #[error("could not read the message body: {0}")]
    ReadBody(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, _)
                if sql_error.code == rusqlite::ErrorCode::OperationInterrupted =>
            {
                Error::QueryTimeout
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::InvalidMonth(_) | Error::MissingMonth | Error::InvalidPagination(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::NotFound => (StatusCode::NOT_FOUND, "not found".to_owned()),
            Error::QueryTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "the query took too long".to_owned(),
            ),
            Error::SeedFetch(_) | Error::InvalidSeedData(_) | Error::SeedInsert(_) => {
                tracing::error!("Seeding failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to initialize database".to_owned(),
                )
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
