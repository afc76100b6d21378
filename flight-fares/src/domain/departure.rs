//! Priced itineraries and their stops.

use std::fmt;

use serde::{Serialize, Serializer};

use super::price::Price;

/// A clock-of-day time as shown on an itinerary, rendered `HHhMM`.
///
/// There is no date or timezone attached: the backend only gives an
/// hour/minute pair per stop, and either half may be missing. Missing parts
/// read as zero.
///
/// # Examples
///
/// ```
/// use flight_fares::domain::ClockTime;
///
/// assert_eq!(ClockTime::from_parts(Some(8), Some(5)).to_string(), "08h05");
/// assert_eq!(ClockTime::from_parts(Some(14), None).to_string(), "14h00");
/// assert_eq!(ClockTime::from_parts(None, Some(45)).to_string(), "00h45");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime {
    hour: u32,
    minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    /// Build from possibly-missing parts, defaulting each to zero.
    pub fn from_parts(hour: Option<u32>, minute: Option<u32>) -> Self {
        Self::new(hour.unwrap_or(0), minute.unwrap_or(0))
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}h{:02}", self.hour, self.minute)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One flown segment of an itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stop {
    /// Departure airport code.
    pub from: String,
    /// Arrival airport code.
    pub to: String,
    pub departure_time: ClockTime,
    pub arrival_time: ClockTime,
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "From {} to {}: Departure {}, Arrival {}",
            self.from, self.to, self.departure_time, self.arrival_time
        )
    }
}

/// A specific priced itinerary for one date pair and passenger count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Departure {
    /// Carrier code of the itinerary.
    pub code: String,
    pub price: Price,
    pub airline: String,
    /// Number of intermediate stops; 0 for a direct flight.
    pub stops_count: usize,
    /// Flown segments, in order.
    pub stops: Vec<Stop>,
}

impl Departure {
    /// Build a departure, deriving the stop count from its segments.
    pub fn new(code: String, price: Price, airline: String, stops: Vec<Stop>) -> Self {
        Self {
            code,
            price,
            airline,
            stops_count: stops.len().saturating_sub(1),
            stops,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.stops_count == 0
    }
}

impl fmt::Display for Departure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) for {}", self.airline, self.code, self.price)?;
        if self.is_direct() {
            write!(f, ", direct")
        } else {
            write!(f, ", {} stops", self.stops_count)
        }
    }
}
