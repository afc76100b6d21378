//! Search configuration for the fare planner.

use chrono::{Local, NaiveDate};

/// Configuration parameters for fare search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// How far ahead of today the backend accepts dates (days).
    /// Requested ranges are clamped to this horizon.
    pub horizon_days: u32,

    /// Longest span a single calendar request may cover (days).
    /// Longer ranges are split in two.
    pub window_days: u32,

    /// Fetch the sub-ranges of a split search concurrently.
    pub parallel_windows: bool,

    /// Fixed "today" for planning. `None` uses the local date.
    pub today: Option<NaiveDate>,
}

impl SearchConfig {
    /// Create a new configuration with the given limits.
    pub fn new(horizon_days: u32, window_days: u32) -> Self {
        Self {
            horizon_days,
            window_days,
            ..Self::default()
        }
    }

    /// Pin "today" (for tests and replaying fixtures).
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Fetch split sub-ranges one after the other.
    pub fn sequential(mut self) -> Self {
        self.parallel_windows = false;
        self
    }

    /// The date planning is relative to.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            horizon_days: 330,
            window_days: 199,
            parallel_windows: true,
            today: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.horizon_days, 330);
        assert_eq!(config.window_days, 199);
        assert!(config.parallel_windows);
        assert!(config.today.is_none());
    }

    #[test]
    fn custom_config() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let config = SearchConfig::new(100, 30).with_today(today).sequential();

        assert_eq!(config.horizon_days, 100);
        assert_eq!(config.window_days, 30);
        assert!(!config.parallel_windows);
        assert_eq!(config.today(), today);
    }
}
