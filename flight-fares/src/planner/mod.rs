//! Fare search planning.
//!
//! This module turns a user's date span into calendar requests, merges the
//! fares they return and narrows shopping results to the cheapest tier.
//!
//! The backend only answers for dates up to a fixed horizon and over a
//! bounded window per request, so a long span becomes two requests whose
//! results are merged cheapest first.

mod config;
mod search;
mod tiers;
mod window;

#[cfg(test)]
mod search_tests;

pub use config::SearchConfig;
pub use search::{FareSearch, SearchError, SearchOutcome, SearchRequest, WindowFailure};
pub use tiers::cheapest_tier;
pub use window::{PlanError, plan};
