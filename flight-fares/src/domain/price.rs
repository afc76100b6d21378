//! Fare prices.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// A price as reported by the backend, in the backend's display currency.
///
/// The backend sends whole numbers in practice, but nothing guarantees it,
/// so the value is kept as `f64`. Ordering uses [`f64::total_cmp`] so prices
/// can be sorted directly.
///
/// # Examples
///
/// ```
/// use flight_fares::domain::Price;
///
/// assert_eq!(Price::new(812.0).to_string(), "812");
/// assert_eq!(Price::new(812.5).to_string(), "812.50");
/// assert!(Price::new(100.0) < Price::new(150.0));
/// ```
#[derive(Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Price {}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u32> for Price {
    fn from(value: u32) -> Self {
        Self(f64::from(value))
    }
}

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price({self})")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{:.2}", self.0)
        }
    }
}
