//! Client for the flights frontend RPC backend.
//!
//! The backend is an undocumented browser API. Requests are a single
//! form-encoded field holding positional JSON; responses are a guarded,
//! doubly-serialised JSON envelope.
//!
//! Key characteristics:
//! - Every response starts with the `)]}'` guard line
//! - RPC payloads are JSON *strings* inside the outer JSON array
//! - Field positions are the only schema, so every offset lives in
//!   [`offsets`] and every decode error names the JSON path that moved

mod client;
mod codec;
mod convert;
mod envelope;
mod error;
mod mock;
mod node;

pub use client::{DEFAULT_BASE_URL, DEFAULT_CONTENT_TYPE, FlightsConfig, HttpTransport, Transport};
pub use codec::{
    PLACE_LOOKUP_RPC_ID, Rpc, decode_form_body, encode_calendar_search, encode_departure_search,
    encode_place_lookup,
};
pub use convert::{QuoteContext, decode_calendar, decode_departures, decode_place, offsets};
pub use envelope::{Envelope, HIJACK_PREFIX, Payload, RPC_RESULT_TAG, decode};
pub use error::{FlightsError, TransportError};
pub use mock::{MockTransport, RecordedRequest};
pub use node::Node;
