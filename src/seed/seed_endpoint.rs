//! The route handler that fills the database with seed data.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error};

use super::{SeedSource, seed_transactions};

/// The message returned after a successful seed.
pub const SEED_SUCCESS_MESSAGE: &str = "Database initialized with seed data";

/// The state needed for seeding the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection that seed records are written to.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Where the seed records come from.
    pub seed_source: Arc<dyn SeedSource>,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            seed_source: state.seed_source.clone(),
        }
    }
}

/// The response body of a successful seed.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SeedResponse {
    /// Always [SEED_SUCCESS_MESSAGE].
    pub message: String,
    /// The number of transactions written to the database.
    pub inserted: usize,
}

/// Fetch the seed data and append it to the transactions in the database.
///
/// The data is fetched before the database lock is taken so that a slow
/// download does not block other requests.
pub async fn seed_endpoint(State(state): State<SeedState>) -> Result<Json<SeedResponse>, Error> {
    let transactions = state.seed_source.fetch().await?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let inserted = seed_transactions(&transactions, &connection)?;

    Ok(Json(SeedResponse {
        message: SEED_SUCCESS_MESSAGE.to_owned(),
        inserted,
    }))
}
