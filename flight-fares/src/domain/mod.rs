//! Domain types for flight fare search.
//!
//! These are the stable, typed records the decoder produces from the
//! backend's positional JSON. They are plain values: constructed per call,
//! never shared between searches.

mod date_range;
mod departure;
mod fare;
mod place;
mod price;

pub use date_range::{DATE_FORMAT, DateRange, InvalidDateRange, parse_date};
pub use departure::{ClockTime, Departure, Stop};
pub use fare::FareQuote;
pub use place::{InvalidMachineId, Place, Route};
pub use price::Price;
