//! Database setup and the helpers shared by the modules that query it.

use std::time::{Duration, Instant};

use rusqlite::{
    Connection, Transaction as SqlTransaction, TransactionBehavior, functions::FunctionFlags,
    types::Value,
};

use crate::{Error, transaction::create_transaction_table};

/// How many SQLite virtual machine instructions run between deadline checks.
const PROGRESS_CHECK_INTERVAL: i32 = 1_000;

/// The SQL function that lower-cases text using Unicode rules.
///
/// SQLite's built-in `lower` only folds ASCII letters.
pub(crate) const UNICODE_LOWER: &str = "unicode_lower";

/// Register the SQL functions and create the tables for the domain models if
/// they do not exist yet.
///
/// Functions are registered per connection, so this must be called for every
/// connection that runs queries.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    register_functions(connection)?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

fn register_functions(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.create_scalar_function(
        UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |context| {
            let text = context.get::<Option<String>>(0)?;
            Ok(text.map(|text| text.to_lowercase()))
        },
    )
}

/// Interrupts SQL statements on `connection` that are still running after a deadline.
///
/// The deadline applies from [QueryDeadline::start] until the guard is dropped.
/// An interrupted statement fails with [Error::QueryTimeout].
pub(crate) struct QueryDeadline<'a> {
    connection: &'a Connection,
}

impl<'a> QueryDeadline<'a> {
    /// Start a deadline `timeout` from now.
    pub(crate) fn start(connection: &'a Connection, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        connection.progress_handler(
            PROGRESS_CHECK_INTERVAL,
            Some(move || Instant::now() > deadline),
        );

        Self { connection }
    }
}

impl Drop for QueryDeadline<'_> {
    fn drop(&mut self) {
        self.connection
            .progress_handler(PROGRESS_CHECK_INTERVAL, None::<fn() -> bool>);
    }
}

/// Accumulates the conditions of a SQL `WHERE` clause and their parameters.
///
/// Conditions use anonymous `?` placeholders, so parameters must be pushed in
/// the same order as the placeholders they bind to.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct WhereClause {
    conditions: Vec<String>,
    params: Vec<Value>,
}

impl WhereClause {
    /// Add a condition, which will be joined to the others with `AND`.
    pub(crate) fn and(mut self, condition: impl Into<String>, params: Vec<Value>) -> Self {
        self.conditions.push(condition.into());
        self.params.extend(params);
        self
    }

    /// Add the conditions and parameters of `other`.
    pub(crate) fn and_all(mut self, other: WhereClause) -> Self {
        self.conditions.extend(other.conditions);
        self.params.extend(other.params);
        self
    }

    /// The clause as SQL, or an empty string if there are no conditions.
    pub(crate) fn to_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// The parameters for the placeholders in [WhereClause::to_sql].
    pub(crate) fn params(&self) -> &[Value] {
        &self.params
    }
}
