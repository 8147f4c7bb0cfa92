//! Implements a struct that holds the state of the REST server.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use rusqlite::Connection;

use crate::{
    Error, config::AppConfig, db::initialize, pagination::PaginationConfig, seed::SeedSource,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// Where the seed endpoint gets its transactions from.
    pub seed_source: Arc<dyn SeedSource>,

    /// The config that controls how to return pages of data.
    pub pagination_config: PaginationConfig,

    /// Requests that take longer than this are aborted.
    pub request_timeout: Duration,

    /// SQL statements that run longer than this are interrupted.
    pub sql_timeout: Duration,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        seed_source: Arc<dyn SeedSource>,
        config: AppConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            seed_source,
            pagination_config: config.pagination,
            request_timeout: config.request_timeout,
            sql_timeout: config.sql_timeout,
        })
    }
}
