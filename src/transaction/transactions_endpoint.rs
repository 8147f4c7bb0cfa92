//! Route handlers that return transactions as JSON.

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

use crate::{
    AppState, Error,
    db::QueryDeadline,
    month::MonthSelector,
    pagination::{PageRequest, Pagination, PaginationConfig},
};

use super::{
    core::{Transaction, get_all_transactions},
    query::{TransactionFilter, search_transactions},
};

/// The state needed for listing transactions.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to return pages of transactions.
    pub pagination_config: PaginationConfig,
    /// SQL statements that run longer than this are interrupted.
    pub sql_timeout: Duration,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
            sql_timeout: state.sql_timeout,
        }
    }
}

/// The query parameters for searching transactions.
///
/// Every field is kept as text so that bad values are reported with our own
/// error messages rather than a generic deserialization failure.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsQuery {
    /// Text to look for in the title or description, or a price.
    pub search: Option<String>,
    /// Only include transactions sold in this month.
    pub month: Option<String>,
    /// The one-based page number.
    pub page: Option<String>,
    /// The maximum number of transactions per page.
    pub per_page: Option<String>,
}

/// A page of transactions and where it sits among the other pages.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionsResponse {
    /// The transactions on the requested page.
    pub transactions: Vec<Transaction>,
    /// Details of the requested page.
    pub pagination: Pagination,
}

/// Every transaction in the database.
#[derive(Debug, Serialize, Deserialize)]
pub struct AllTransactionsResponse {
    /// Every transaction, in the order they were stored.
    pub transactions: Vec<Transaction>,
}

/// Search transactions, returning a single page of results.
///
/// A blank `month` is ignored; any other value must be a valid month.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionsState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<TransactionsResponse>, Error> {
    let month = match query.month.as_deref().map(str::trim) {
        Some(month) if !month.is_empty() => Some(month.parse::<MonthSelector>()?),
        _ => None,
    };
    let page = PageRequest::parse(
        query.page.as_deref(),
        query.per_page.as_deref(),
        &state.pagination_config,
    )?;
    let filter = TransactionFilter {
        search: query.search,
        month,
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;
    let _deadline = QueryDeadline::start(&connection, state.sql_timeout);

    let results = search_transactions(&filter, page, &connection)
        .inspect_err(|error| tracing::error!("could not search transactions {filter:?}: {error}"))?;

    Ok(Json(TransactionsResponse {
        pagination: Pagination::new(page, results.total),
        transactions: results.transactions,
    }))
}

/// List every transaction without pagination.
pub async fn get_all_transactions_endpoint(
    State(state): State<TransactionsState>,
) -> Result<Json<AllTransactionsResponse>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;
    let _deadline = QueryDeadline::start(&connection, state.sql_timeout);

    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(Json(AllTransactionsResponse { transactions }))
}
