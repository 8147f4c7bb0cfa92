//! Helpers shared by the unit tests.

use rusqlite::Connection;
use time::macros::datetime;

use crate::{
    db::initialize,
    transaction::{NewTransaction, Transaction, create_transaction},
};

/// An initialized, empty in-memory database.
pub(crate) fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&conn).expect("Could not initialize database");
    conn
}

/// Insert each of `transactions`, panicking on failure.
pub(crate) fn insert_transactions(transactions: &[NewTransaction], connection: &Connection) {
    for transaction in transactions {
        create_transaction(transaction, connection).expect("Could not create test transaction");
    }
}

/// A sold and an unsold product in March 2022.
pub(crate) fn march_2022_transactions() -> Vec<NewTransaction> {
    vec![
        Transaction::build("Jacket", 150.0, datetime!(2022-03-15 10:00 UTC))
            .category("A")
            .sold(true),
        Transaction::build("Socks", 50.0, datetime!(2022-03-20 10:00 UTC))
            .category("B")
            .sold(false),
    ]
}

/// Products sold in months other than March.
pub(crate) fn other_month_transactions() -> Vec<NewTransaction> {
    vec![
        Transaction::build("Hat", 75.0, datetime!(2022-04-01 00:00 UTC))
            .category("A")
            .sold(true),
        Transaction::build("Scarf", 999.0, datetime!(2021-02-28 23:59 UTC))
            .category("C")
            .sold(true),
    ]
}

/// A product sold in March of a different year.
pub(crate) fn march_2021_transaction() -> NewTransaction {
    Transaction::build("Gloves", 250.0, datetime!(2021-03-10 12:00 UTC))
        .category("C")
        .sold(true)
}
