//! Product transactions.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `NewTransaction` builder
//! - Database functions for storing, searching and counting transactions
//! - Route handlers for listing transactions

mod core;
mod query;
mod transactions_endpoint;

pub use core::{
    NewTransaction, Transaction, count_transactions, create_transaction,
    create_transaction_table,
};
pub use transactions_endpoint::{get_all_transactions_endpoint, get_transactions_endpoint};
