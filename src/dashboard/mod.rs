//! Monthly dashboard aggregations.
//!
//! Provides sales statistics, a price histogram and a category breakdown for
//! the transactions dated in a given month, plus a combined view of all three.

mod categories;
mod combined;
mod handlers;
mod histogram;
mod statistics;

pub use handlers::{
    get_bar_chart_endpoint, get_combined_endpoint, get_pie_chart_endpoint,
    get_statistics_endpoint,
};
