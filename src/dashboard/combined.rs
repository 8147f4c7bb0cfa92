//! Every monthly aggregation in one result.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, month::MonthSelector};

use super::{
    categories::{CategoryCount, get_category_breakdown},
    histogram::{PriceRangeCount, get_price_histogram},
    statistics::{Statistics, get_statistics},
};

/// Every dashboard aggregation for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedData {
    /// Sales totals.
    pub statistics: Statistics,
    /// Transaction counts by price range.
    pub bar_chart_data: Vec<PriceRangeCount>,
    /// Transaction counts by category.
    pub pie_chart_data: Vec<CategoryCount>,
}

/// Run every dashboard aggregation for `month`.
///
/// # Errors
/// Returns the first error from any of the aggregations. No partial result is
/// returned.
pub fn get_combined_data(
    month: &MonthSelector,
    connection: &Connection,
) -> Result<CombinedData, Error> {
    Ok(CombinedData {
        statistics: get_statistics(month, connection)?,
        bar_chart_data: get_price_histogram(month, connection)?,
        pie_chart_data: get_category_breakdown(month, connection)?,
    })
}
