//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// The sale of a product, or a product listed for sale that has not sold yet.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The name of the product.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The price of the product, never negative.
    pub price: f64,
    /// The category of the product, e.g. "electronics".
    pub category: String,
    /// Whether the product has been sold.
    pub sold: bool,
    /// When the product was sold, or listed for sale if it has not been sold.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// A URL for a picture of the product.
    pub image: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(title: &str, price: f64, date_of_sale: OffsetDateTime) -> NewTransaction {
        NewTransaction {
            title: title.to_owned(),
            description: String::new(),
            price,
            category: String::new(),
            sold: false,
            date_of_sale,
            image: String::new(),
        }
    }
}

/// A transaction that has not been stored yet.
///
/// This is also the shape of each object in the seed data, which is why it
/// can be deserialized. Fields other than the ones below, such as an `id`
/// assigned by the seed data's own source, are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// The name of the product.
    pub title: String,
    /// A text description of the product.
    #[serde(default)]
    pub description: String,
    /// The price of the product.
    ///
    /// Must be a finite, non-negative number, see [NewTransaction::validate].
    pub price: f64,
    /// The category of the product.
    pub category: String,
    /// Whether the product has been sold.
    pub sold: bool,
    /// When the product was sold, as an RFC 3339 date-time.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// A URL for a picture of the product.
    #[serde(default)]
    pub image: String,
}

impl NewTransaction {
    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set whether the product has been sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }

    /// Set the image URL.
    pub fn image(mut self, image: &str) -> Self {
        self.image = image.to_owned();
        self
    }

    /// Check the invariants that the database relies on.
    ///
    /// # Errors
    /// Returns [Error::InvalidSeedData] if the price is negative, NaN or infinite.
    pub fn validate(&self) -> Result<(), Error> {
        if self.price.is_finite() && self.price >= 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidSeedData(format!(
                "the price of \"{}\" must be a non-negative number, got {}",
                self.title, self.price
            )))
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns of the transaction table in the order [map_transaction_row] expects.
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, title, description, price, category, sold, date_of_sale, image";

/// Create a new transaction in the database.
///
/// The sale date is converted to UTC before it is stored.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error,
/// including when the price violates the table's constraints.
pub fn create_transaction(
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let created = connection
        .prepare_cached(&format!(
            "INSERT INTO \"transaction\" (title, description, price, category, sold, date_of_sale, image)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                &transaction.title,
                &transaction.description,
                transaction.price,
                &transaction.category,
                transaction.sold,
                format_date_of_sale(transaction.date_of_sale)?,
                &transaction.image,
            ),
            map_transaction_row,
        )?;

    Ok(created)
}

/// Retrieve every transaction in the order they were stored.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" ORDER BY id ASC"
        ))?
        .query_map([], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL CHECK (price >= 0),
                category TEXT NOT NULL,
                sold INTEGER NOT NULL,
                date_of_sale TEXT NOT NULL,
                image TEXT NOT NULL DEFAULT ''
                )",
        (),
    )?;

    Ok(())
}

/// Format a sale date as the UTC RFC 3339 text stored in the database, e.g.
/// "2022-03-15T10:00:00Z".
fn format_date_of_sale(date_of_sale: OffsetDateTime) -> Result<String, Error> {
    date_of_sale
        .to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|error| {
            Error::InvalidSeedData(format!("could not format {date_of_sale}: {error}"))
        })
}

/// Map a database row to a Transaction.
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let description = row.get(2)?;
    let price = row.get(3)?;
    let category = row.get(4)?;
    let sold = row.get(5)?;
    let date_of_sale: String = row.get(6)?;
    let date_of_sale = OffsetDateTime::parse(&date_of_sale, &Rfc3339).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(error))
    })?;
    let image = row.get(7)?;

    Ok(Transaction {
        id,
        title,
        description,
        price,
        category,
        sold,
        date_of_sale,
        image,
    })
}

// ============================================================================
// TESTS
// ============================================================================
