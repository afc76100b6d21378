//! Fare search across calendar windows.
//!
//! A search resolves both places, plans the calendar windows covering the
//! requested dates, fetches every window and merges the quotes cheapest
//! first. A window that fails contributes no fares; the failure is reported
//! alongside the results instead of aborting the search.

use chrono::NaiveDate;
use futures::future::{join_all, try_join};
use tracing::{debug, info, warn};

use crate::domain::{DateRange, Departure, FareQuote, Place, Route};
use crate::flights::{
    FlightsError, QuoteContext, Rpc, Transport, decode_calendar, decode_departures, decode_place,
    encode_calendar_search, encode_departure_search, encode_place_lookup,
};

use super::config::SearchConfig;
use super::tiers::cheapest_tier;
use super::window::{PlanError, plan};

/// Error from fare search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Origin or destination could not be resolved
    #[error("failed to resolve place")]
    Place(#[source] FlightsError),

    /// Requested dates cannot be searched
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Shopping results for a date pair failed
    #[error("failed to fetch departures")]
    Departures(#[source] FlightsError),

    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),
}

/// Request for a fare search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Origin as typed by the user: IATA code or place name.
    pub origin: String,

    /// Destination as typed by the user.
    pub destination: String,

    /// Trip length in days.
    pub duration: u32,

    pub passengers: u32,

    /// First outbound date wanted.
    pub start: NaiveDate,

    /// Last outbound date wanted.
    pub end: NaiveDate,

    /// Maximum number of fares to return; 0 returns all.
    pub limit: usize,
}

impl SearchRequest {
    /// Create a request for a one-week trip for one passenger, unlimited.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            duration: 7,
            passengers: 1,
            start,
            end,
            limit: 0,
        }
    }

    pub fn with_duration(mut self, days: u32) -> Self {
        self.duration = days;
        self
    }

    pub fn with_passengers(mut self, passengers: u32) -> Self {
        self.passengers = passengers;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Validate the search request.
    ///
    /// A trip may not be longer than the booking horizon.
    pub fn validate(&self, config: &SearchConfig) -> Result<(), SearchError> {
        if self.passengers == 0 {
            return Err(SearchError::InvalidRequest(
                "at least one passenger is required".to_string(),
            ));
        }

        if self.origin.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(SearchError::InvalidRequest(
                "origin and destination must not be empty".to_string(),
            ));
        }

        if self.duration > config.horizon_days {
            return Err(SearchError::InvalidRequest(format!(
                "trip of {} days exceeds the {}-day horizon",
                self.duration, config.horizon_days
            )));
        }

        Ok(())
    }
}

/// A calendar window that produced no fares because its request failed.
#[derive(Debug)]
pub struct WindowFailure {
    pub range: DateRange,
    pub error: FlightsError,
}

/// Result of a fare search.
#[derive(Debug)]
pub struct SearchOutcome {
    /// The resolved places searched between.
    pub route: Route,

    /// Fares, cheapest first. Equal prices keep window and backend order.
    pub fares: Vec<FareQuote>,

    /// Windows that failed and were skipped.
    pub failures: Vec<WindowFailure>,
}

impl SearchOutcome {
    /// Whether any window was skipped, so `fares` may be incomplete.
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Fare search over a backend transport.
pub struct FareSearch<'a, T: Transport> {
    transport: &'a T,
    config: &'a SearchConfig,
}

impl<'a, T: Transport> FareSearch<'a, T> {
    /// Create a new fare search.
    pub fn new(transport: &'a T, config: &'a SearchConfig) -> Self {
        Self { transport, config }
    }

    /// Resolve a free-text query (IATA code or name) to a place.
    pub async fn resolve_place(&self, query: &str) -> Result<Place, FlightsError> {
        let raw = self
            .transport
            .post(Rpc::PlaceLookup, encode_place_lookup(query))
            .await?;
        let place = decode_place(&raw, query)?;

        debug!(query, place = %place, code = %place.code, "resolved place");
        Ok(place)
    }

    /// Resolve both ends of a trip.
    pub async fn resolve_route(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Route, FlightsError> {
        let (origin, destination) =
            try_join(self.resolve_place(origin), self.resolve_place(destination)).await?;
        Ok(Route::new(origin, destination))
    }

    /// Search calendar fares for a request.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        request.validate(self.config)?;

        let ranges = plan(request.start, request.end, self.config.today(), self.config)?;
        let route = self
            .resolve_route(&request.origin, &request.destination)
            .await
            .map_err(SearchError::Place)?;

        info!(
            route = %route,
            windows = ranges.len(),
            duration = request.duration,
            passengers = request.passengers,
            "searching fares"
        );

        let results = if self.config.parallel_windows {
            let fetches = ranges.iter().map(|&range| {
                let route = &route;
                async move { (range, self.fetch_window(route, request, range).await) }
            });
            join_all(fetches).await
        } else {
            let mut results = Vec::with_capacity(ranges.len());
            for &range in &ranges {
                results.push((range, self.fetch_window(&route, request, range).await));
            }
            results
        };

        let mut fares = Vec::new();
        let mut failures = Vec::new();
        for (range, result) in results {
            match result {
                Ok(quotes) => {
                    debug!(range = %range, fares = quotes.len(), "window fetched");
                    fares.extend(quotes);
                }
                Err(error) => {
                    warn!(
                        range = %range,
                        error = %error,
                        transport = error.is_transport(),
                        "calendar window failed, continuing without it"
                    );
                    failures.push(WindowFailure { range, error });
                }
            }
        }

        fares.sort_by_key(|fare| fare.price);
        if request.limit > 0 {
            fares.truncate(request.limit);
        }

        info!(
            fares = fares.len(),
            failed_windows = failures.len(),
            "search complete"
        );

        Ok(SearchOutcome {
            route,
            fares,
            failures,
        })
    }

    /// Fetch the cheapest-tier departures for one date pair.
    pub async fn get_departures(
        &self,
        route: &Route,
        date_from: NaiveDate,
        date_to: NaiveDate,
        passengers: u32,
    ) -> Result<Vec<Departure>, SearchError> {
        let body = encode_departure_search(
            &route.origin.code,
            &route.destination.code,
            date_from,
            date_to,
            passengers,
        );
        let raw = self
            .transport
            .post(Rpc::ShoppingResults, body)
            .await
            .map_err(|e| SearchError::Departures(e.into()))?;
        let departures = decode_departures(&raw).map_err(SearchError::Departures)?;

        let found = departures.len();
        let tier = cheapest_tier(departures);
        debug!(
            %date_from,
            %date_to,
            found,
            kept = tier.len(),
            "departures fetched"
        );

        Ok(tier)
    }

    async fn fetch_window(
        &self,
        route: &Route,
        request: &SearchRequest,
        range: DateRange,
    ) -> Result<Vec<FareQuote>, FlightsError> {
        let body = encode_calendar_search(
            &route.origin.code,
            &route.destination.code,
            request.duration,
            request.passengers,
            range,
        )?;
        let raw = self.transport.post(Rpc::CalendarGraph, body).await?;

        decode_calendar(
            &raw,
            QuoteContext {
                route,
                duration: request.duration,
                passengers: request.passengers,
            },
        )
    }
}
