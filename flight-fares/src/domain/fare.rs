//! Calendar fare quotes.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::date_range::DATE_FORMAT;
use super::price::Price;

/// The cheapest price the backend knows for one outbound/return date pair.
///
/// Quotes carry place *names* rather than full places; they are summaries
/// for display and ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareQuote {
    pub origin: String,
    pub destination: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub price: Price,
    /// Trip length in days.
    pub duration: u32,
    pub passengers: u32,
}

impl fmt::Display for FareQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {} to {} ({} days, {} passengers) for {}",
            self.origin,
            self.destination,
            self.date_from.format(DATE_FORMAT),
            self.date_to.format(DATE_FORMAT),
            self.duration,
            self.passengers,
            self.price
        )
    }
}
