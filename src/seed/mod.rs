//! Loading the product dataset into the database.
//!
//! The data comes from a [SeedSource], usually a JSON document downloaded over
//! HTTP, and is appended to the transaction table in a single SQL transaction.

mod loader;
mod seed_endpoint;
mod source;

pub use loader::seed_transactions;
pub use seed_endpoint::seed_endpoint;
pub use source::{DEFAULT_SEED_URL, FileSeedSource, HttpSeedSource, SeedSource};

#[cfg(test)]
pub(crate) use source::StaticSeedSource;
