//! Conversion from backend responses to domain types.
//!
//! Each decoder takes the raw response text, unwraps the envelope and then
//! walks the payload with [`Node`] accessors at the offsets listed in
//! [`offsets`]. Those offsets were read off known-good responses; when the
//! backend moves a field, decoding fails with `UnexpectedShape` naming the
//! slot that moved.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{ClockTime, Departure, FareQuote, Place, Price, Route, Stop, parse_date};

use super::envelope::{self, RPC_RESULT_TAG};
use super::error::FlightsError;
use super::node::Node;

/// Positional offsets into the decoded payloads.
pub mod offsets {
    /// `place[0][0][0]`: best-matching place record.
    pub const PLACE_RECORD: [usize; 3] = [0, 0, 0];
    pub const PLACE_NAME: usize = 1;
    pub const PLACE_IATA: usize = 2;
    pub const PLACE_MACHINE_ID: usize = 4;

    /// `calendar[1]`: one child per date pair.
    pub const CALENDAR_DATES: usize = 1;
    pub const CALENDAR_DATE_FROM: usize = 0;
    pub const CALENDAR_DATE_TO: usize = 1;
    /// `child[2]`: price block, null when the pair has no fare.
    pub const CALENDAR_PRICE_BLOCK: usize = 2;
    /// `child[2][0][1]`: low value of the first price tier.
    pub const CALENDAR_PRICE: [usize; 2] = [0, 1];

    /// `departures[2][0]`: best itineraries, cheapest first.
    pub const DEPARTURE_CANDIDATES: [usize; 2] = [2, 0];
    pub const CANDIDATE_ITINERARY: usize = 0;
    pub const CANDIDATE_PRICE_BLOCK: usize = 1;
    /// `candidate[1][0][1]`
    pub const CANDIDATE_PRICE: [usize; 2] = [0, 1];
    pub const ITINERARY_CARRIER: usize = 0;
    /// `itinerary[1][0]`: first marketing airline name.
    pub const ITINERARY_AIRLINE: [usize; 2] = [1, 0];
    pub const ITINERARY_SEGMENTS: usize = 2;

    pub const SEGMENT_FROM: usize = 3;
    pub const SEGMENT_TO: usize = 6;
    pub const SEGMENT_DEPARTURE_TIME: usize = 8;
    pub const SEGMENT_ARRIVAL_TIME: usize = 10;
    pub const TIME_HOUR: usize = 0;
    pub const TIME_MINUTE: usize = 1;
}

/// Search parameters echoed into every decoded [`FareQuote`].
#[derive(Debug, Clone, Copy)]
pub struct QuoteContext<'a> {
    pub route: &'a Route,
    pub duration: u32,
    pub passengers: u32,
}

/// Decode a place lookup response into the best-matching place.
pub fn decode_place(raw: &str, query: &str) -> Result<Place, FlightsError> {
    let not_found = || FlightsError::PlaceNotFound {
        query: query.to_string(),
    };

    let envelope = envelope::decode(raw)?;
    let payload = envelope.first_payload("place")?.ok_or_else(not_found)?;
    let root = payload.root();

    let record = root
        .get_path(&offsets::PLACE_RECORD)?
        .ok_or_else(not_found)?;

    let name = record.at(offsets::PLACE_NAME)?.str()?;
    let iata = record.at(offsets::PLACE_IATA)?.str()?;
    let machine_id = record.at(offsets::PLACE_MACHINE_ID)?;

    Place::from_machine_id(name, machine_id.str()?, iata)
        .map_err(|_| machine_id.shape_error("machine id path like /m/<code>"))
}

/// Decode a calendar response into one quote per priced date pair.
///
/// Date pairs without a price are skipped. A payload holding only its
/// metadata element means the window has no fares at all.
pub fn decode_calendar(
    raw: &str,
    context: QuoteContext<'_>,
) -> Result<Vec<FareQuote>, FlightsError> {
    let envelope = envelope::decode(raw)?;
    let Some(payload) = envelope.tagged_payload(RPC_RESULT_TAG, "calendar")? else {
        return Ok(Vec::new());
    };
    let root = payload.root();

    if root.len()? <= 1 {
        return Ok(Vec::new());
    }

    let dates = root.at(offsets::CALENDAR_DATES)?;
    if dates.is_null() {
        return Ok(Vec::new());
    }

    let mut quotes = Vec::new();
    for child in dates.items()? {
        let Some(price) = calendar_price(&child)? else {
            debug!(path = child.path(), "no price for date pair, skipping");
            continue;
        };

        quotes.push(FareQuote {
            origin: context.route.origin.name.clone(),
            destination: context.route.destination.name.clone(),
            date_from: date_at(&child, offsets::CALENDAR_DATE_FROM)?,
            date_to: date_at(&child, offsets::CALENDAR_DATE_TO)?,
            price,
            duration: context.duration,
            passengers: context.passengers,
        });
    }

    Ok(quotes)
}

fn calendar_price(child: &Node<'_>) -> Result<Option<Price>, FlightsError> {
    let Some(block) = child.get(offsets::CALENDAR_PRICE_BLOCK)? else {
        return Ok(None);
    };
    block
        .get_path(&offsets::CALENDAR_PRICE)?
        .map(|node| node.number().map(Price::new))
        .transpose()
}

fn date_at(node: &Node<'_>, index: usize) -> Result<NaiveDate, FlightsError> {
    let slot = node.at(index)?;
    parse_date(slot.str()?).map_err(|_| slot.shape_error("date formatted as YYYY-MM-DD"))
}

/// Decode a shopping response into departures, in backend order.
///
/// Candidates without a price are skipped. A missing candidate list means
/// there are no itineraries for the date pair.
pub fn decode_departures(raw: &str) -> Result<Vec<Departure>, FlightsError> {
    let envelope = envelope::decode(raw)?;
    let Some(payload) = envelope.first_payload("departures")? else {
        return Ok(Vec::new());
    };
    let root = payload.root();

    let Some(candidates) = root.get_path(&offsets::DEPARTURE_CANDIDATES)? else {
        return Ok(Vec::new());
    };

    let mut departures = Vec::new();
    for candidate in candidates.items()? {
        match decode_candidate(&candidate)? {
            Some(departure) => departures.push(departure),
            None => debug!(path = candidate.path(), "itinerary has no price, skipping"),
        }
    }

    Ok(departures)
}

fn decode_candidate(candidate: &Node<'_>) -> Result<Option<Departure>, FlightsError> {
    let price = match candidate.get(offsets::CANDIDATE_PRICE_BLOCK)? {
        Some(block) => block.get_path(&offsets::CANDIDATE_PRICE)?,
        None => None,
    };
    let Some(price) = price else {
        return Ok(None);
    };
    let price = Price::new(price.number()?);

    let itinerary = candidate.at(offsets::CANDIDATE_ITINERARY)?;
    let code = itinerary.at(offsets::ITINERARY_CARRIER)?.str()?;
    let airline = itinerary.at_path(&offsets::ITINERARY_AIRLINE)?.str()?;

    let stops = itinerary
        .at(offsets::ITINERARY_SEGMENTS)?
        .items()?
        .iter()
        .map(decode_segment)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Departure::new(
        code.to_string(),
        price,
        airline.to_string(),
        stops,
    )))
}

fn decode_segment(segment: &Node<'_>) -> Result<Stop, FlightsError> {
    Ok(Stop {
        from: segment.at(offsets::SEGMENT_FROM)?.str()?.to_string(),
        to: segment.at(offsets::SEGMENT_TO)?.str()?.to_string(),
        departure_time: clock_time(segment, offsets::SEGMENT_DEPARTURE_TIME)?,
        arrival_time: clock_time(segment, offsets::SEGMENT_ARRIVAL_TIME)?,
    })
}

/// Read an `[hour, minute]` pair. Either half, or the whole pair, may be
/// missing; the backend drops zero values.
fn clock_time(segment: &Node<'_>, index: usize) -> Result<ClockTime, FlightsError> {
    let Some(pair) = segment.get(index)? else {
        return Ok(ClockTime::default());
    };
    let hour = pair.get(offsets::TIME_HOUR)?.map(|n| n.u32()).transpose()?;
    let minute = pair.get(offsets::TIME_MINUTE)?.map(|n| n.u32()).transpose()?;
    Ok(ClockTime::from_parts(hour, minute))
}
