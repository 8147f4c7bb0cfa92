//! Searching transactions by text, price and month, one page at a time.

use rusqlite::{Connection, params_from_iter, types::Value};

use crate::{
    Error,
    db::{UNICODE_LOWER, WhereClause},
    month::MonthSelector,
    pagination::PageRequest,
};

use super::core::{TRANSACTION_COLUMNS, Transaction, map_transaction_row};

/// How close a price must be to a numeric search term to match it.
const PRICE_MATCH_TOLERANCE: f64 = 0.005;

/// Which transactions to include in a search.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Text that must appear in the title or description, ignoring case, or a
    /// number the price must equal. `None` or an empty string matches everything.
    pub search: Option<String>,
    /// Only include transactions sold in this month.
    pub month: Option<MonthSelector>,
}

impl TransactionFilter {
    fn where_clause(&self) -> WhereClause {
        let mut clause = WhereClause::default();

        if let Some(search) = self.search.as_deref().filter(|search| !search.is_empty()) {
            let text_condition = format!(
                "instr({UNICODE_LOWER}(title), {UNICODE_LOWER}(?)) > 0 \
                OR instr({UNICODE_LOWER}(description), {UNICODE_LOWER}(?)) > 0"
            );
            let text_params = vec![Value::Text(search.to_owned()), Value::Text(search.to_owned())];

            clause = match parse_price(search) {
                Some(price) => clause.and(
                    format!("({text_condition} OR abs(price - ?) < {PRICE_MATCH_TOLERANCE})"),
                    [text_params, vec![Value::Real(price)]].concat(),
                ),
                None => clause.and(format!("({text_condition})"), text_params),
            };
        }

        if let Some(month) = &self.month {
            clause = clause.and_all(month.where_clause());
        }

        clause
    }
}

/// Interpret a search term as a price.
///
/// Only finite numbers are prices, so "NaN" and "inf" are matched as text.
fn parse_price(search: &str) -> Option<f64> {
    search
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPage {
    /// The transactions on the requested page, in the order they were stored.
    pub transactions: Vec<Transaction>,
    /// The number of transactions matching the filter across all pages.
    pub total: u64,
}

/// Get the page `page` of the transactions that match `filter`.
///
/// Transactions are ordered by ID so that repeated calls against unchanged
/// data page through the same sequence.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error,
/// or [Error::QueryTimeout] if a query was interrupted.
pub fn search_transactions(
    filter: &TransactionFilter,
    page: PageRequest,
    connection: &Connection,
) -> Result<TransactionPage, Error> {
    let where_clause = filter.where_clause();
    let where_sql = where_clause.to_sql();

    let limit = i64::try_from(page.per_page).unwrap_or(i64::MAX);
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    let page_params = where_clause
        .params()
        .iter()
        .cloned()
        .chain([Value::Integer(limit), Value::Integer(offset)]);

    let transactions = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" {where_sql} ORDER BY id ASC LIMIT ? OFFSET ?"
        ))?
        .query_map(params_from_iter(page_params), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect::<Result<Vec<_>, _>>()?;

    let total = connection.query_row(
        &format!("SELECT COUNT(id) FROM \"transaction\" {where_sql}"),
        params_from_iter(where_clause.params()),
        |row| row.get(0),
    )?;

    Ok(TransactionPage {
        transactions,
        total,
    })
}
