//! Flights backend error types.

use chrono::NaiveDate;

/// Failure to get a response body out of the backend.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Client could not be built from its configuration
    #[error("invalid transport configuration: {0}")]
    Config(String),

    /// No response available (offline transports)
    #[error("no response available: {0}")]
    Unavailable(String),
}

/// Errors from one request/decode round trip against the backend.
#[derive(Debug, thiserror::Error)]
pub enum FlightsError {
    /// The request never produced a body
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Prefix, outer JSON or an embedded JSON string did not parse
    #[error("malformed response envelope: {reason}")]
    MalformedEnvelope { reason: String },

    /// Place lookup matched nothing
    #[error("no place matches {query:?}")]
    PlaceNotFound { query: String },

    /// A nested-offset assumption about the response was violated
    #[error("unexpected response shape at {path}: expected {expected}")]
    UnexpectedShape { path: String, expected: &'static str },

    /// A request date plus an offset falls outside the calendar
    #[error("{date} plus {days} days is not a valid date")]
    DateOutOfRange { date: NaiveDate, days: u32 },
}

impl FlightsError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        FlightsError::MalformedEnvelope {
            reason: reason.into(),
        }
    }

    /// Whether this failure came from the transport rather than the payload.
    pub fn is_transport(&self) -> bool {
        matches!(self, FlightsError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FlightsError::PlaceNotFound {
            query: "Atlantis".into(),
        };
        assert_eq!(err.to_string(), r#"no place matches "Atlantis""#);

        let err = FlightsError::UnexpectedShape {
            path: "calendar[1][0][2]".into(),
            expected: "array",
        };
        assert_eq!(
            err.to_string(),
            "unexpected response shape at calendar[1][0][2]: expected array"
        );

        let err = FlightsError::from(TransportError::Status {
            status: 503,
            body: "Service Unavailable".into(),
        });
        assert_eq!(
            err.to_string(),
            "backend returned status 503: Service Unavailable"
        );
        assert!(err.is_transport());

        let err = FlightsError::malformed("empty body");
        assert_eq!(err.to_string(), "malformed response envelope: empty body");
        assert!(!err.is_transport());
    }
}
