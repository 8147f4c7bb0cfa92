//! Dashboard route handlers.
//!
//! Every handler takes a required `month` query parameter and returns one or
//! all of the monthly aggregations as JSON.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, db::QueryDeadline, month::MonthSelector};

use super::{
    categories::{CategoryCount, get_category_breakdown},
    combined::{CombinedData, get_combined_data},
    histogram::{PriceRangeCount, get_price_histogram},
    statistics::{Statistics, get_statistics},
};

/// The state needed for the dashboard endpoints.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// SQL statements that run longer than this are interrupted.
    pub sql_timeout: Duration,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            sql_timeout: state.sql_timeout,
        }
    }
}

/// The query parameters for the dashboard endpoints.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MonthQuery {
    /// The month to aggregate, see [MonthSelector] for the accepted formats.
    pub month: Option<String>,
}

/// Parse the month and run `aggregate` with a deadline on the database connection.
fn aggregate_month<T>(
    state: &DashboardState,
    query: &MonthQuery,
    aggregate: impl FnOnce(&MonthSelector, &Connection) -> Result<T, Error>,
) -> Result<T, Error> {
    let month = MonthSelector::from_query(query.month.as_deref())?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;
    let _deadline = QueryDeadline::start(&connection, state.sql_timeout);

    aggregate(&month, &connection)
        .inspect_err(|error| tracing::error!("could not aggregate transactions for {month}: {error}"))
}

/// Get the sales totals for a month.
pub async fn get_statistics_endpoint(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Statistics>, Error> {
    aggregate_month(&state, &query, get_statistics).map(Json)
}

/// Get the number of transactions in each price range for a month.
pub async fn get_bar_chart_endpoint(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<PriceRangeCount>>, Error> {
    aggregate_month(&state, &query, get_price_histogram).map(Json)
}

/// Get the number of transactions in each category for a month.
pub async fn get_pie_chart_endpoint(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<CategoryCount>>, Error> {
    aggregate_month(&state, &query, get_category_breakdown).map(Json)
}

/// Get the statistics, bar chart and pie chart data for a month in one response.
///
/// If any aggregation fails the whole request fails.
pub async fn get_combined_endpoint(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CombinedData>, Error> {
    aggregate_month(&state, &query, get_combined_data).map(Json)
}
