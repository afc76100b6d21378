//! Offline transport serving canned responses.
//!
//! Responses are keyed by RPC and, optionally, a *needle*: a substring the
//! decoded request must contain (a place query, a window start date). A
//! response with a matching needle wins over one without.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::client::Transport;
use super::codec::{Rpc, decode_form_body};
use super::error::TransportError;

#[derive(Debug, Clone)]
enum MockReply {
    Body(String),
    Status(u16),
}

#[derive(Debug, Clone)]
struct MockResponse {
    rpc: Rpc,
    needle: Option<String>,
    reply: MockReply,
}

/// A request seen by the mock, with its `f.req` value decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub rpc: Rpc,
    pub request: String,
}

/// Transport that answers from memory instead of the network.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Vec<MockResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `<rpc>.txt` / `<rpc>@<needle>.txt` file in a directory.
    ///
    /// Files whose stem does not start with a known RPC name are ignored.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, TransportError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            TransportError::Unavailable(format!("failed to read fixture directory {dir:?}: {e}"))
        })?;

        let mut mock = Self::new();
        for entry in entries {
            let path = entry
                .map_err(|e| TransportError::Unavailable(format!("failed to read entry: {e}")))?
                .path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("txt") {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let (name, needle) = match stem.split_once('@') {
                Some((name, needle)) => (name, Some(needle)),
                None => (stem, None),
            };
            let Some(rpc) = Rpc::from_name(name) else {
                debug!(file = %path.display(), "not a fixture for a known RPC, skipping");
                continue;
            };

            let body = std::fs::read_to_string(&path).map_err(|e| {
                TransportError::Unavailable(format!("failed to read {path:?}: {e}"))
            })?;
            mock.responses.push(MockResponse {
                rpc,
                needle: needle.map(str::to_string),
                reply: MockReply::Body(body),
            });
        }

        if mock.responses.is_empty() {
            return Err(TransportError::Unavailable(format!(
                "no fixture files found in {dir:?}"
            )));
        }

        Ok(mock)
    }

    /// Answer every `rpc` request with `body`.
    pub fn with_response(mut self, rpc: Rpc, body: impl Into<String>) -> Self {
        self.responses.push(MockResponse {
            rpc,
            needle: None,
            reply: MockReply::Body(body.into()),
        });
        self
    }

    /// Answer `rpc` requests containing `needle` with `body`.
    pub fn with_response_for(
        mut self,
        rpc: Rpc,
        needle: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.responses.push(MockResponse {
            rpc,
            needle: Some(needle.into()),
            reply: MockReply::Body(body.into()),
        });
        self
    }

    /// Fail `rpc` requests containing `needle` with an HTTP status.
    pub fn with_status_for(mut self, rpc: Rpc, needle: impl Into<String>, status: u16) -> Self {
        self.responses.push(MockResponse {
            rpc,
            needle: Some(needle.into()),
            reply: MockReply::Status(status),
        });
        self
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn find(&self, rpc: Rpc, request: &str) -> Option<&MockReply> {
        let for_rpc = || self.responses.iter().filter(move |r| r.rpc == rpc);

        for_rpc()
            .find(|r| r.needle.as_deref().is_some_and(|n| request.contains(n)))
            .or_else(|| for_rpc().find(|r| r.needle.is_none()))
            .map(|r| &r.reply)
    }
}

impl Transport for MockTransport {
    async fn post(&self, rpc: Rpc, body: String) -> Result<String, TransportError> {
        let request = decode_form_body(&body).unwrap_or(body);

        let reply = self.find(rpc, &request).cloned();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest { rpc, request });

        match reply {
            Some(MockReply::Body(body)) => Ok(body),
            Some(MockReply::Status(status)) => Err(TransportError::Status {
                status,
                body: "mock failure".to_string(),
            }),
            None => Err(TransportError::Unavailable(format!(
                "no mock response for {} request",
                rpc.name()
            ))),
        }
    }
}
