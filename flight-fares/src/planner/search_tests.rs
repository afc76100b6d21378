//! Tests for fare search against an offline transport.

use super::*;
use crate::domain::{DateRange, Price, parse_date};
use crate::flights::{FlightsError, HIJACK_PREFIX, MockTransport, Rpc, TransportError};
use chrono::NaiveDate;
use serde_json::{Value, json};

const PLACE_MCZ: &str = include_str!("../../data/fixtures/place_lookup@MCZ.txt");
const PLACE_SANTIAGO: &str = include_str!("../../data/fixtures/place_lookup@Santiago.txt");
const PLACE_NONE: &str = include_str!("../../data/fixtures/place_lookup@Atlantis.txt");
const CALENDAR: &str = include_str!("../../data/fixtures/calendar@2025-08-01.txt");
const DEPARTURES: &str = include_str!("../../data/fixtures/departures.txt");

fn date(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

fn config() -> SearchConfig {
    SearchConfig::default().with_today(date("2025-06-01"))
}

fn fixtures_dir() -> String {
    concat!(env!("CARGO_MANIFEST_DIR"), "/data/fixtures").to_string()
}

/// Mock that resolves MCZ and Santiago.
fn places() -> MockTransport {
    MockTransport::new()
        .with_response_for(Rpc::PlaceLookup, "MCZ", PLACE_MCZ)
        .with_response_for(Rpc::PlaceLookup, "Santiago", PLACE_SANTIAGO)
        .with_response_for(Rpc::PlaceLookup, "Atlantis", PLACE_NONE)
}

/// Build a calendar response from `(date_from, date_to, price)` triples.
fn calendar_response(entries: &[(&str, &str, Option<u32>)]) -> String {
    let children: Vec<Value> = entries
        .iter()
        .map(|(from, to, price)| match price {
            Some(price) => json!([from, to, [[null, price], "token"], 1]),
            None => json!([from, to, null, 1]),
        })
        .collect();
    let payload = json!([[null, null], children]);
    let envelope = json!([["wrb.fr", null, payload.to_string()], ["di", 42]]);

    format!("{HIJACK_PREFIX}\n\n{envelope}")
}

fn request() -> SearchRequest {
    SearchRequest::new("MCZ", "Santiago", date("2025-08-01"), date("2025-09-30"))
        .with_duration(7)
        .with_passengers(2)
}

fn count_requests(mock: &MockTransport, rpc: Rpc) -> usize {
    mock.requests().iter().filter(|r| r.rpc == rpc).count()
}

#[tokio::test]
async fn cheapest_fare_from_fixtures() {
    let mock = MockTransport::from_dir(fixtures_dir()).unwrap();
    let config = config();
    let search = FareSearch::new(&mock, &config);

    let outcome = search.search(&request().with_limit(1)).await.unwrap();

    assert_eq!(outcome.route.origin.iata, "MCZ");
    assert_eq!(outcome.route.destination.iata, "SCL");
    assert!(!outcome.is_degraded());

    assert_eq!(outcome.fares.len(), 1);
    let fare = &outcome.fares[0];
    assert_eq!(fare.origin, "Maceió");
    assert_eq!(fare.destination, "Santiago");
    assert_eq!(fare.date_from, date("2025-08-12"));
    assert_eq!(fare.date_to, date("2025-08-19"));
    assert_eq!(fare.price, Price::from(2841));
    assert_eq!(fare.duration, 7);
    assert_eq!(fare.passengers, 2);

    let window = DateRange::new(date("2025-08-01"), date("2025-09-30")).unwrap();
    assert!(window.contains(fare.date_from));

    assert_eq!(count_requests(&mock, Rpc::PlaceLookup), 2);
    assert_eq!(count_requests(&mock, Rpc::CalendarGraph), 1);
}

#[tokio::test]
async fn calendar_request_uses_resolved_codes() {
    let mock = places().with_response(Rpc::CalendarGraph, CALENDAR);
    let config = config();
    let search = FareSearch::new(&mock, &config);

    search.search(&request()).await.unwrap();

    let calendar = mock
        .requests()
        .into_iter()
        .find(|r| r.rpc == Rpc::CalendarGraph)
        .unwrap();
    assert!(calendar.request.contains("/m/03p3l7t"));
    assert!(calendar.request.contains("/m/0dl6fv"));
    assert!(calendar.request.contains("2025-09-30"));
}

#[tokio::test]
async fn zero_limit_returns_all_sorted() {
    let mock = places().with_response(Rpc::CalendarGraph, CALENDAR);
    let config = config();
    let search = FareSearch::new(&mock, &config);

    let outcome = search.search(&request()).await.unwrap();

    assert_eq!(outcome.fares.len(), 11);
    for pair in outcome.fares.windows(2) {
        assert!(pair[0].price <= pair[1].price);
    }
}

#[tokio::test]
async fn limit_keeps_cheapest() {
    let mock = places().with_response(Rpc::CalendarGraph, CALENDAR);
    let config = config();
    let search = FareSearch::new(&mock, &config);

    let outcome = search.search(&request().with_limit(3)).await.unwrap();

    let prices: Vec<_> = outcome.fares.iter().map(|f| f.price).collect();
    assert_eq!(
        prices,
        vec![Price::from(2841), Price::from(2841), Price::from(2870)]
    );
    // Equal prices keep backend order.
    assert_eq!(outcome.fares[0].date_from, date("2025-08-12"));
    assert_eq!(outcome.fares[1].date_from, date("2025-08-13"));
}

#[tokio::test]
async fn limit_larger_than_results_returns_all() {
    let mock = places().with_response(Rpc::CalendarGraph, CALENDAR);
    let config = config();
    let search = FareSearch::new(&mock, &config);

    let outcome = search.search(&request().with_limit(50)).await.unwrap();
    assert_eq!(outcome.fares.len(), 11);
}

#[tokio::test]
async fn split_windows_are_merged_and_sorted() {
    // Clamped span 2025-06-01..=2026-03-01 splits at 2025-12-17 / 2025-12-18.
    let first = calendar_response(&[
        ("2025-06-10", "2025-06-17", Some(500)),
        ("2025-06-11", "2025-06-18", Some(300)),
        ("2025-06-12", "2025-06-19", None),
    ]);
    let second = calendar_response(&[
        ("2026-01-10", "2026-01-17", Some(400)),
        ("2026-01-11", "2026-01-18", Some(300)),
    ]);

    for config in [config(), config().sequential()] {
        let mock = places()
            .with_response_for(Rpc::CalendarGraph, "2025-06-01", first.clone())
            .with_response_for(Rpc::CalendarGraph, "2025-12-18", second.clone());
        let search = FareSearch::new(&mock, &config);
        let request = SearchRequest::new("MCZ", "Santiago", date("2025-01-01"), date("2026-03-01"));

        let outcome = search.search(&request).await.unwrap();

        assert_eq!(count_requests(&mock, Rpc::CalendarGraph), 2);
        let got: Vec<_> = outcome
            .fares
            .iter()
            .map(|f| (f.date_from, f.price))
            .collect();
        assert_eq!(
            got,
            vec![
                (date("2025-06-11"), Price::from(300)),
                (date("2026-01-11"), Price::from(300)),
                (date("2026-01-10"), Price::from(400)),
                (date("2025-06-10"), Price::from(500)),
            ]
        );
    }
}

#[tokio::test]
async fn failed_window_degrades_to_no_fares() {
    for config in [config(), config().sequential()] {
        let mock = places()
            .with_response_for(Rpc::CalendarGraph, "2025-06-01", CALENDAR)
            .with_status_for(Rpc::CalendarGraph, "2025-12-18", 503);
        let search = FareSearch::new(&mock, &config);
        let request = SearchRequest::new("MCZ", "Santiago", date("2025-06-01"), date("2026-03-01"));

        let outcome = search.search(&request).await.unwrap();

        assert_eq!(outcome.fares.len(), 11);
        assert!(outcome.is_degraded());
        assert_eq!(outcome.failures.len(), 1);

        let failure = &outcome.failures[0];
        assert_eq!(failure.range.from(), date("2025-12-18"));
        assert_eq!(failure.range.to(), date("2026-03-01"));
        assert!(matches!(
            failure.error,
            FlightsError::Transport(TransportError::Status { status: 503, .. })
        ));
    }
}

#[tokio::test]
async fn malformed_window_degrades_to_no_fares() {
    let mock = places().with_response(Rpc::CalendarGraph, "<html>rate limited</html>");
    let config = config();
    let search = FareSearch::new(&mock, &config);

    let outcome = search.search(&request()).await.unwrap();

    assert!(outcome.fares.is_empty());
    assert!(matches!(
        outcome.failures[0].error,
        FlightsError::MalformedEnvelope { .. }
    ));
}

#[tokio::test]
async fn unknown_place_aborts_search() {
    let mock = places().with_response(Rpc::CalendarGraph, CALENDAR);
    let config = config();
    let search = FareSearch::new(&mock, &config);
    let request = SearchRequest::new("MCZ", "Atlantis", date("2025-08-01"), date("2025-09-30"));

    let err = search.search(&request).await.unwrap_err();

    match err {
        SearchError::Place(FlightsError::PlaceNotFound { query }) => assert_eq!(query, "Atlantis"),
        other => panic!("expected PlaceNotFound, got {other:?}"),
    }
    assert_eq!(count_requests(&mock, Rpc::CalendarGraph), 0);
}

#[tokio::test]
async fn place_lookup_failure_aborts_search() {
    let mock = places().with_status_for(Rpc::PlaceLookup, "Lima", 500);
    let config = config();
    let search = FareSearch::new(&mock, &config);
    let request = SearchRequest::new("MCZ", "Lima", date("2025-08-01"), date("2025-09-30"));

    let err = search.search(&request).await.unwrap_err();
    assert!(matches!(
        err,
        SearchError::Place(FlightsError::Transport(TransportError::Status { status: 500, .. }))
    ));
}

#[tokio::test]
async fn past_dates_are_rejected_before_any_request() {
    let mock = places();
    let config = config();
    let search = FareSearch::new(&mock, &config);
    let request = SearchRequest::new("MCZ", "Santiago", date("2025-01-01"), date("2025-03-01"));

    let err = search.search(&request).await.unwrap_err();

    assert!(matches!(err, SearchError::Plan(PlanError::InvalidRange { .. })));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn zero_passengers_is_invalid() {
    let mock = places();
    let config = config();
    let search = FareSearch::new(&mock, &config);

    let err = search
        .search(&request().with_passengers(0))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidRequest(_)));
}

#[tokio::test]
async fn resolve_place_by_name() {
    let mock = places();
    let config = config();
    let search = FareSearch::new(&mock, &config);

    let place = search.resolve_place("Santiago").await.unwrap();
    assert_eq!(place.iata, "SCL");
    assert_eq!(place.machine_id(), "/m/0dl6fv");
}

#[tokio::test]
async fn departures_keep_cheapest_tier() {
    let mock = places().with_response(Rpc::ShoppingResults, DEPARTURES);
    let config = config();
    let search = FareSearch::new(&mock, &config);

    let route = search.resolve_route("MCZ", "Santiago").await.unwrap();
    let departures = search
        .get_departures(&route, date("2025-08-12"), date("2025-08-19"), 2)
        .await
        .unwrap();

    assert_eq!(departures.len(), 2);
    assert!(departures.iter().all(|d| d.price == Price::from(2841)));
    assert_eq!(departures[0].airline, "LATAM");
    assert_eq!(departures[1].airline, "GOL");

    let shopping = mock
        .requests()
        .into_iter()
        .find(|r| r.rpc == Rpc::ShoppingResults)
        .unwrap();
    assert!(shopping.request.contains("2025-08-12"));
    assert!(shopping.request.contains("2025-08-19"));
}

#[tokio::test]
async fn departures_failure_is_reported() {
    let mock = places().with_status_for(Rpc::ShoppingResults, "2025-08-12", 502);
    let config = config();
    let search = FareSearch::new(&mock, &config);

    let route = search.resolve_route("MCZ", "Santiago").await.unwrap();
    let err = search
        .get_departures(&route, date("2025-08-12"), date("2025-08-19"), 2)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SearchError::Departures(FlightsError::Transport(_))
    ));
}

#[tokio::test]
async fn oversized_duration_is_invalid() {
    let mock = places().with_response(Rpc::CalendarGraph, CALENDAR);
    let config = config();
    let search = FareSearch::new(&mock, &config);

    let err = search
        .search(&request().with_duration(u32::MAX))
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::InvalidRequest(_)));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn duration_up_to_horizon_is_accepted() {
    let mock = places().with_response(Rpc::CalendarGraph, CALENDAR);
    let config = config();
    let search = FareSearch::new(&mock, &config);

    let outcome = search.search(&request().with_duration(330)).await;
    assert!(outcome.is_ok());
}

#[tokio::test]
async fn place_error_reports_cause_once() {
    use std::error::Error;

    let mock = places();
    let config = config();
    let search = FareSearch::new(&mock, &config);
    let request = SearchRequest::new("MCZ", "Atlantis", date("2025-08-01"), date("2025-09-30"));

    let err = search.search(&request).await.unwrap_err();

    let cause = err.source().unwrap().to_string();
    assert!(cause.contains("Atlantis"));
    assert!(!err.to_string().contains("Atlantis"));
}
