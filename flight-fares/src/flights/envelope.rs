//! Outer response envelope.
//!
//! Every response is `)]}'` followed by a JSON array of entries. Entries that
//! carry RPC results look like `["wrb.fr", <rpc id or null>, "<json string>", ...]`;
//! the third slot is the actual payload, serialised a second time.

use serde_json::Value;

use super::error::FlightsError;
use super::node::Node;

/// Anti-JSON-hijacking guard prepended to every response.
pub const HIJACK_PREFIX: &str = ")]}'";

/// Tag in slot 0 of entries that carry an RPC result.
pub const RPC_RESULT_TAG: &str = "wrb.fr";

const ENTRY_TAG: usize = 0;
const ENTRY_PAYLOAD: usize = 2;

/// A parsed response envelope.
#[derive(Debug, Clone)]
pub struct Envelope {
    entries: Value,
}

/// An entry's payload after parsing its embedded JSON string.
#[derive(Debug, Clone)]
pub struct Payload {
    label: String,
    value: Value,
}

impl Payload {
    pub fn root(&self) -> Node<'_> {
        Node::root(self.label.clone(), &self.value)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Strip the guard prefix and parse the outer array.
///
/// A missing prefix is tolerated: some intermediaries strip it already.
pub fn decode(raw: &str) -> Result<Envelope, FlightsError> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix(HIJACK_PREFIX).unwrap_or(trimmed).trim();

    if body.is_empty() {
        return Err(FlightsError::malformed("empty response body"));
    }

    let entries: Value = serde_json::from_str(body).map_err(|e| {
        FlightsError::malformed(format!(
            "outer JSON: {} (body: {})",
            e,
            body.chars().take(200).collect::<String>()
        ))
    })?;

    if !entries.is_array() {
        return Err(FlightsError::malformed("outer JSON is not an array"));
    }

    Ok(Envelope { entries })
}

impl Envelope {
    pub fn root(&self) -> Node<'_> {
        Node::root("envelope", &self.entries)
    }

    /// Payload of the first entry, whatever its tag. `None` if the slot is null.
    pub fn first_payload(&self, label: &str) -> Result<Option<Payload>, FlightsError> {
        let entry = self.root().at(0)?;
        parse_payload(&entry, label)
    }

    /// Payload of the first entry tagged `tag`. `None` if the slot is null.
    pub fn tagged_payload(&self, tag: &str, label: &str) -> Result<Option<Payload>, FlightsError> {
        let root = self.root();
        for entry in root.items()? {
            let matches = entry
                .get(ENTRY_TAG)
                .ok()
                .flatten()
                .and_then(|t| t.value().as_str())
                == Some(tag);
            if matches {
                return parse_payload(&entry, label);
            }
        }

        Err(FlightsError::UnexpectedShape {
            path: root.path().to_string(),
            expected: "an entry tagged wrb.fr",
        })
    }
}

fn parse_payload(entry: &Node<'_>, label: &str) -> Result<Option<Payload>, FlightsError> {
    match entry.get(ENTRY_PAYLOAD)? {
        Some(slot) => Ok(Some(Payload {
            label: label.to_string(),
            value: slot.parse_embedded()?,
        })),
        None => Ok(None),
    }
}
