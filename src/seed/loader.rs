//! Writing seed transactions to the database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    transaction::{NewTransaction, create_transaction},
};

/// Insert every transaction in `transactions` and return how many were inserted.
///
/// Existing rows are kept, so seeding twice stores each record twice. Either
/// all of the records are inserted or none are.
///
/// # Errors
/// Returns [Error::InvalidSeedData] if any record is invalid, in which case
/// nothing is written, or [Error::SeedInsert] if the database rejects a record.
pub fn seed_transactions(
    transactions: &[NewTransaction],
    connection: &Connection,
) -> Result<usize, Error> {
    transactions.iter().try_for_each(NewTransaction::validate)?;

    let sql_transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)
        .map_err(|error| Error::SeedInsert(error.to_string()))?;

    for transaction in transactions {
        create_transaction(transaction, &sql_transaction)
            .map_err(|error| Error::SeedInsert(format!("\"{}\": {error}", transaction.title)))?;
    }

    sql_transaction
        .commit()
        .map_err(|error| Error::SeedInsert(error.to_string()))?;

    tracing::info!("Inserted {} seed transactions", transactions.len());

    Ok(transactions.len())
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        Error,
        test_utils::{get_test_connection, march_2022_transactions},
        transaction::{Transaction, count_transactions},
    };

    use super::seed_transactions;

    #[test]
    fn inserts_every_record() {
        let conn = get_test_connection();

        let inserted = seed_transactions(&march_2022_transactions(), &conn).unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(count_transactions(&conn), Ok(2));
    }

    #[test]
    fn seeding_twice_duplicates_records() {
        let conn = get_test_connection();

        seed_transactions(&march_2022_transactions(), &conn).unwrap();
        seed_transactions(&march_2022_transactions(), &conn).unwrap();

        assert_eq!(count_transactions(&conn), Ok(4));
    }

    #[test]
    fn empty_seed_inserts_nothing() {
        let conn = get_test_connection();

        assert_eq!(seed_transactions(&[], &conn), Ok(0));
        assert_eq!(count_transactions(&conn), Ok(0));
    }

    #[test]
    fn invalid_record_rejects_the_whole_batch() {
        let conn = get_test_connection();
        let mut transactions = march_2022_transactions();
        transactions.push(Transaction::build(
            "Broken",
            -1.0,
            datetime!(2022-03-01 00:00 UTC),
        ));

        let result = seed_transactions(&transactions, &conn);

        assert!(matches!(result, Err(Error::InvalidSeedData(_))), "got {result:?}");
        assert_eq!(count_transactions(&conn), Ok(0));
    }
}
