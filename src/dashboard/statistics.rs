//! Monthly sales totals.

use rusqlite::{Connection, params_from_iter};
use serde::{Deserialize, Serialize};

use crate::{Error, db::WhereClause, month::MonthSelector};

/// Sales totals for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of the products sold in the month.
    pub total_sale_amount: f64,
    /// The number of products sold in the month.
    pub total_sold_items: u64,
    /// The number of products dated in the month that were not sold.
    pub total_not_sold_items: u64,
}

/// Calculate the sales totals for the transactions dated in `month`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error,
/// or [Error::QueryTimeout] if a query was interrupted.
pub fn get_statistics(month: &MonthSelector, connection: &Connection) -> Result<Statistics, Error> {
    let sold = month.where_clause().and("sold = 1", vec![]);
    let not_sold = month.where_clause().and("sold = 0", vec![]);

    Ok(Statistics {
        total_sale_amount: select_one("COALESCE(SUM(price), 0.0)", &sold, connection)?,
        total_sold_items: select_one("COUNT(id)", &sold, connection)?,
        total_not_sold_items: select_one("COUNT(id)", &not_sold, connection)?,
    })
}

/// Evaluate the aggregate expression `aggregate` over the rows matching `where_clause`.
fn select_one<T: rusqlite::types::FromSql>(
    aggregate: &str,
    where_clause: &WhereClause,
    connection: &Connection,
) -> Result<T, Error> {
    connection
        .query_row(
            &format!(
                "SELECT {aggregate} FROM \"transaction\" {}",
                where_clause.to_sql()
            ),
            params_from_iter(where_clause.params()),
            |row| row.get(0),
        )
        .map_err(Error::from)
}
