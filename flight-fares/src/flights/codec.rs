//! Request payload encoding.
//!
//! The backend's RPC dispatcher takes a single form field, `f.req`, whose
//! value is a nested positional JSON array. There is no schema: slot order
//! and `null` placeholders must match a known-good browser request exactly,
//! or the backend silently answers with empty or garbage data. Treat the
//! shapes below as a fixed contract; the golden tests pin them.

use chrono::{Days, NaiveDate};
use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, percent_encode};
use serde_json::{Value, json};

use crate::domain::{DATE_FORMAT, DateRange};

use super::error::FlightsError;

/// Form field carrying the request.
const FORM_FIELD: &str = "f.req";

/// RPC id of the place autocomplete method on the batch endpoint.
pub const PLACE_LOOKUP_RPC_ID: &str = "H028ib";

/// Place reference kind used inside leg descriptors.
const PLACE_REF_KIND: u8 = 4;

/// Trip type slot: round trip.
const TRIP_ROUND: u8 = 1;

/// Cabin slot: economy.
const CABIN_ECONOMY: u8 = 1;

/// Trailing marker of the outbound and return leg descriptors.
const LEG_OUTBOUND: u8 = 3;
const LEG_RETURN: u8 = 1;

/// Result-type filters requested from place autocomplete.
const PLACE_RESULT_TYPES: [u8; 5] = [1, 2, 3, 5, 4];

/// A backend RPC method, addressed by the trailing path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rpc {
    /// Cheapest fare per date pair over a window.
    CalendarGraph,
    /// Itineraries for one date pair.
    ShoppingResults,
    /// Free-text place autocomplete (batch endpoint).
    PlaceLookup,
}

impl Rpc {
    pub const ALL: [Rpc; 3] = [Rpc::CalendarGraph, Rpc::ShoppingResults, Rpc::PlaceLookup];

    /// Path relative to the configured base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Rpc::CalendarGraph => {
                "travel.frontend.flights.FlightsFrontendService/GetCalendarGraph"
            }
            Rpc::ShoppingResults => {
                "travel.frontend.flights.FlightsFrontendService/GetShoppingResults"
            }
            Rpc::PlaceLookup => "batchexecute?rpcids=H028ib",
        }
    }

    /// Short name used in logs and fixture file names.
    pub fn name(&self) -> &'static str {
        match self {
            Rpc::CalendarGraph => "calendar",
            Rpc::ShoppingResults => "departures",
            Rpc::PlaceLookup => "place_lookup",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Rpc::ALL.into_iter().find(|rpc| rpc.name() == name)
    }
}

/// Encode a calendar search over `range` for a fixed trip length.
///
/// The outbound leg is pinned to the start of the range and the return leg
/// to `duration_days` later; the backend slides both across the window.
/// Fails if the return date is not representable.
pub fn encode_calendar_search(
    origin_code: &str,
    destination_code: &str,
    duration_days: u32,
    passengers: u32,
    range: DateRange,
) -> Result<String, FlightsError> {
    let outbound = range.from();
    let inbound = outbound
        .checked_add_days(Days::new(u64::from(duration_days)))
        .ok_or(FlightsError::DateOutOfRange {
            date: outbound,
            days: duration_days,
        })?;

    let inner = json!([
        null,
        trip_filters(origin_code, destination_code, outbound, inbound, passengers),
        [wire_date(range.from()), wire_date(range.to())],
        null,
        [duration_days, duration_days]
    ]);

    Ok(form_body(&json!([null, inner.to_string()])))
}

/// Encode a shopping-results request for one outbound/return date pair.
pub fn encode_departure_search(
    origin_code: &str,
    destination_code: &str,
    date_from: NaiveDate,
    date_to: NaiveDate,
    passengers: u32,
) -> String {
    let inner = json!([
        [],
        trip_filters(origin_code, destination_code, date_from, date_to, passengers),
        0,
        0,
        0,
        1
    ]);

    form_body(&json!([null, inner.to_string()]))
}

/// Encode a free-text place lookup (IATA code or name).
pub fn encode_place_lookup(query: &str) -> String {
    let args = json!([query, PLACE_RESULT_TYPES, null, [1, 1, 1], 1]);
    form_body(&json!([[[
        PLACE_LOOKUP_RPC_ID,
        args.to_string(),
        null,
        "generic"
    ]]]))
}

/// Recover the `f.req` JSON text from an encoded form body.
pub fn decode_form_body(body: &str) -> Option<String> {
    let value = body.strip_prefix(FORM_FIELD)?.strip_prefix('=')?;
    percent_decode_str(value)
        .decode_utf8()
        .ok()
        .map(|text| text.into_owned())
}

fn form_body(request: &Value) -> String {
    let text = request.to_string();
    let encoded = percent_encode(text.as_bytes(), NON_ALPHANUMERIC);
    format!("{FORM_FIELD}={encoded}")
}

fn wire_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Shared filter block: trip type, passengers and the two leg descriptors.
fn trip_filters(
    origin_code: &str,
    destination_code: &str,
    outbound: NaiveDate,
    inbound: NaiveDate,
    passengers: u32,
) -> Value {
    let origin = format!("/m/{origin_code}");
    let destination = format!("/m/{destination_code}");

    json!([
        null,
        null,
        TRIP_ROUND,
        null,
        [],
        CABIN_ECONOMY,
        [passengers, 0, 0, 0],
        null,
        null,
        null,
        null,
        null,
        null,
        [
            leg(&origin, &destination, outbound, LEG_OUTBOUND),
            leg(&destination, &origin, inbound, LEG_RETURN)
        ],
        null,
        null,
        null,
        1
    ])
}

fn leg(from: &str, to: &str, date: NaiveDate, marker: u8) -> Value {
    json!([
        [[[from, PLACE_REF_KIND]]],
        [[[to, PLACE_REF_KIND]]],
        null,
        0,
        null,
        null,
        wire_date(date),
        null,
        null,
        null,
        null,
        null,
        null,
        null,
        marker
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const GOLDEN_CALENDAR: &str = include_str!("../../data/fixtures/golden/calendar_request.json");
    const GOLDEN_DEPARTURES: &str =
        include_str!("../../data/fixtures/golden/departures_request.json");
    const GOLDEN_PLACE: &str = include_str!("../../data/fixtures/golden/place_lookup_request.json");

    #[test]
    fn calendar_search_matches_golden() {
        let range = DateRange::new(date(2025, 8, 1), date(2025, 9, 30)).unwrap();
        let body = encode_calendar_search("03p3l7t", "0dl6fv", 7, 2, range).unwrap();

        let decoded = decode_form_body(&body).unwrap();
        assert_eq!(decoded, GOLDEN_CALENDAR.trim());
    }

    #[test]
    fn departure_search_matches_golden() {
        let body =
            encode_departure_search("03p3l7t", "0dl6fv", date(2025, 8, 12), date(2025, 8, 19), 2);

        let decoded = decode_form_body(&body).unwrap();
        assert_eq!(decoded, GOLDEN_DEPARTURES.trim());
    }

    #[test]
    fn place_lookup_matches_golden() {
        let body = encode_place_lookup("Santiago");

        let decoded = decode_form_body(&body).unwrap();
        assert_eq!(decoded, GOLDEN_PLACE.trim());
    }

    #[test]
    fn body_is_single_percent_encoded_field() {
        let body = encode_place_lookup("São Paulo");

        assert!(body.starts_with("f.req=%5B"));
        let value = &body["f.req=".len()..];
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric() || c == '%'));
        assert!(decode_form_body(&body).unwrap().contains("São Paulo"));
    }

    #[test]
    fn inner_payload_is_stringified_json() {
        let range = DateRange::new(date(2025, 8, 1), date(2025, 8, 31)).unwrap();
        let body = encode_calendar_search("a", "b", 3, 1, range).unwrap();

        let outer: Value = serde_json::from_str(&decode_form_body(&body).unwrap()).unwrap();
        assert!(outer[0].is_null());
        let inner: Value = serde_json::from_str(outer[1].as_str().unwrap()).unwrap();

        assert_eq!(inner[2], json!(["2025-08-01", "2025-08-31"]));
        assert_eq!(inner[4], json!([3, 3]));
        // Return leg is pinned `duration` days after the outbound leg.
        assert_eq!(inner[1][13][0][6], json!("2025-08-01"));
        assert_eq!(inner[1][13][1][6], json!("2025-08-04"));
        assert_eq!(inner[1][13][1][0], json!([[["/m/b", 4]]]));
    }

    #[test]
    fn calendar_search_rejects_unrepresentable_return_date() {
        let range = DateRange::new(date(2025, 8, 1), date(2025, 8, 31)).unwrap();
        let err = encode_calendar_search("a", "b", u32::MAX, 1, range).unwrap_err();

        assert!(matches!(
            err,
            FlightsError::DateOutOfRange { days: u32::MAX, .. }
        ));
    }

    #[test]
    fn decode_form_body_rejects_other_fields() {
        assert!(decode_form_body("q=abc").is_none());
        assert!(decode_form_body("f.req").is_none());
    }

    #[test]
    fn rpc_names_roundtrip() {
        for rpc in Rpc::ALL {
            assert_eq!(Rpc::from_name(rpc.name()), Some(rpc));
        }
        assert_eq!(Rpc::from_name("unknown"), None);
    }

    #[test]
    fn rpc_paths_end_in_method() {
        assert!(Rpc::CalendarGraph.path().ends_with("/GetCalendarGraph"));
        assert!(Rpc::ShoppingResults.path().ends_with("/GetShoppingResults"));
        assert!(Rpc::PlaceLookup.path().contains(PLACE_LOOKUP_RPC_ID));
    }
}
