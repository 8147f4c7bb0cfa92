//! Transaction counts by price range.

use rusqlite::{Connection, params_from_iter};
use serde::{Deserialize, Serialize};

use crate::{Error, month::MonthSelector};

/// The number of price buckets in the histogram.
pub const PRICE_BUCKET_COUNT: usize = 10;

/// The width of every bucket except the last, which is open ended.
const PRICE_BUCKET_WIDTH: u32 = 100;

/// The number of transactions whose price falls in a bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeCount {
    /// The bucket label, e.g. "101-200".
    pub price_range: String,
    /// The number of transactions in the bucket.
    pub count: u64,
}

/// The label of the bucket at `index`.
///
/// Labels show whole-number bounds: "0-100", "101-200", ..., "901-above".
pub fn price_range_label(index: usize) -> String {
    let upper = PRICE_BUCKET_WIDTH * (index as u32 + 1);

    match index {
        0 => format!("0-{upper}"),
        index if index + 1 == PRICE_BUCKET_COUNT => {
            format!("{}-above", upper - PRICE_BUCKET_WIDTH + 1)
        }
        _ => format!("{}-{upper}", upper - PRICE_BUCKET_WIDTH + 1),
    }
}

/// An SQL expression that gives the bucket index of the `price` column.
///
/// Each bucket includes its upper bound, so a price of 100 is in "0-100" and
/// 100.5 is in "101-200".
fn bucket_index_sql() -> String {
    let cases: String = (0..PRICE_BUCKET_COUNT - 1)
        .map(|index| {
            format!(
                "WHEN price <= {} THEN {index} ",
                PRICE_BUCKET_WIDTH * (index as u32 + 1)
            )
        })
        .collect();

    format!("CASE {cases}ELSE {} END", PRICE_BUCKET_COUNT - 1)
}

/// Count the transactions dated in `month` by price range.
///
/// Always returns [PRICE_BUCKET_COUNT] entries in ascending price order,
/// including buckets with a count of zero.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error,
/// or [Error::QueryTimeout] if the query was interrupted.
pub fn get_price_histogram(
    month: &MonthSelector,
    connection: &Connection,
) -> Result<Vec<PriceRangeCount>, Error> {
    let where_clause = month.where_clause();
    let mut counts = [0u64; PRICE_BUCKET_COUNT];

    let mut statement = connection.prepare(&format!(
        "SELECT {} AS bucket, COUNT(id) FROM \"transaction\" {} GROUP BY bucket",
        bucket_index_sql(),
        where_clause.to_sql()
    ))?;
    let rows = statement.query_map(params_from_iter(where_clause.params()), |row| {
        Ok((row.get::<_, usize>(0)?, row.get::<_, u64>(1)?))
    })?;

    for row in rows {
        let (bucket, count) = row?;
        if let Some(slot) = counts.get_mut(bucket) {
            *slot = count;
        }
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| PriceRangeCount {
            price_range: price_range_label(index),
            count,
        })
        .collect())
}
