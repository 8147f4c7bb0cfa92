//! Transaction counts by product category.

use rusqlite::{Connection, params_from_iter};
use serde::{Deserialize, Serialize};

use crate::{Error, month::MonthSelector};

/// The number of transactions in a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category name.
    pub category: String,
    /// The number of transactions in the category.
    pub count: u64,
}

/// Count the transactions dated in `month` by category, ordered by category.
///
/// Categories without any transactions in the month are left out.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error,
/// or [Error::QueryTimeout] if the query was interrupted.
pub fn get_category_breakdown(
    month: &MonthSelector,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    let where_clause = month.where_clause();

    connection
        .prepare(&format!(
            "SELECT category, COUNT(id) FROM \"transaction\" {} GROUP BY category ORDER BY category ASC",
            where_clause.to_sql()
        ))?
        .query_map(params_from_iter(where_clause.params()), |row| {
            Ok(CategoryCount {
                category: row.get(0)?,
                count: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<CategoryCount>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::datetime};

    use crate::{
        month::MonthSelector,
        test_utils::{
            get_test_connection, insert_transactions, march_2021_transaction,
            march_2022_transactions, other_month_transactions,
        },
        transaction::Transaction,
    };

    use super::{CategoryCount, get_category_breakdown};

    fn category_count(category: &str, count: u64) -> CategoryCount {
        CategoryCount {
            category: category.to_owned(),
            count,
        }
    }

    #[test]
    fn counts_each_category_in_the_month() {
        let conn = get_test_connection();
        insert_transactions(&march_2022_transactions(), &conn);
        insert_transactions(&other_month_transactions(), &conn);
        insert_transactions(&[march_2021_transaction()], &conn);

        let got = get_category_breakdown(&MonthSelector::any_year(Month::March), &conn).unwrap();

        assert_eq!(
            got,
            [
                category_count("A", 1),
                category_count("B", 1),
                category_count("C", 1)
            ]
        );
    }

    #[test]
    fn empty_month_has_no_categories() {
        let conn = get_test_connection();
        insert_transactions(&march_2022_transactions(), &conn);

        let got = get_category_breakdown(&MonthSelector::any_year(Month::January), &conn).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn category_counts_add_up_to_the_month_count() {
        let conn = get_test_connection();
        let categories = ["electronics", "jewelery", "men's clothing", "women's clothing"];
        let transactions: Vec<_> = (0..25)
            .map(|i| {
                Transaction::build("Product", 20.0, datetime!(2022-11-05 00:00 UTC))
                    .category(categories[i % categories.len()])
            })
            .collect();
        insert_transactions(&transactions, &conn);

        let got = get_category_breakdown(&MonthSelector::any_year(Month::November), &conn).unwrap();

        let names: Vec<_> = got.iter().map(|entry| entry.category.as_str()).collect();
        assert_eq!(names, categories);
        assert_eq!(got.iter().map(|entry| entry.count).sum::<u64>(), 25);
    }
}
