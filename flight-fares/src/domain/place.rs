//! Resolved origin/destination identities.

use std::fmt;

use serde::Serialize;

/// Error returned when a machine id cannot be turned into a place code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid machine id {value:?}: {reason}")]
pub struct InvalidMachineId {
    value: String,
    reason: &'static str,
}

/// A place the backend knows about (airport or city).
///
/// `code` is the backend's internal identifier, i.e. the last segment of a
/// machine-id path such as `/m/0dl6fv`. It is *not* the IATA code; the IATA
/// code is kept separately for display.
///
/// # Examples
///
/// ```
/// use flight_fares::domain::Place;
///
/// let scl = Place::from_machine_id("Santiago", "/m/0dl6fv", "SCL").unwrap();
/// assert_eq!(scl.code, "0dl6fv");
/// assert_eq!(scl.machine_id(), "/m/0dl6fv");
///
/// assert!(Place::from_machine_id("Santiago", "/m/", "SCL").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Place {
    /// Display name, e.g. "Santiago".
    pub name: String,
    /// Backend machine-id code, e.g. "0dl6fv".
    pub code: String,
    /// IATA airport or city code, e.g. "SCL".
    pub iata: String,
}

impl Place {
    /// Create a place from its parts.
    pub fn new(name: impl Into<String>, code: impl Into<String>, iata: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            iata: iata.into(),
        }
    }

    /// Create a place from a machine-id path, keeping only its last segment.
    pub fn from_machine_id(
        name: impl Into<String>,
        machine_id: &str,
        iata: impl Into<String>,
    ) -> Result<Self, InvalidMachineId> {
        let code = machine_id_code(machine_id)?;
        Ok(Self::new(name, code, iata))
    }

    /// The `/m/<code>` path the request grammar expects.
    pub fn machine_id(&self) -> String {
        format!("/m/{}", self.code)
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.iata)
    }
}

/// Extract the last path segment of a machine id.
fn machine_id_code(machine_id: &str) -> Result<&str, InvalidMachineId> {
    if !machine_id.starts_with('/') {
        return Err(InvalidMachineId {
            value: machine_id.to_string(),
            reason: "must be a path starting with '/'",
        });
    }

    match machine_id.rsplit('/').next() {
        Some(code) if !code.is_empty() => Ok(code),
        _ => Err(InvalidMachineId {
            value: machine_id.to_string(),
            reason: "last path segment is empty",
        }),
    }
}

/// The resolved origin and destination of one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub origin: Place,
    pub destination: Place,
}

impl Route {
    pub fn new(origin: Place, destination: Place) -> Self {
        Self {
            origin,
            destination,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.origin, self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_last_segment() {
        let place = Place::from_machine_id("Maceió", "/m/03p3l7t", "MCZ").unwrap();
        assert_eq!(place.code, "03p3l7t");
        assert_eq!(place.iata, "MCZ");
        assert_eq!(place.name, "Maceió");
    }

    #[test]
    fn machine_id_roundtrip() {
        let place = Place::new("Santiago", "0dl6fv", "SCL");
        assert_eq!(place.machine_id(), "/m/0dl6fv");
    }

    #[test]
    fn other_namespaces_keep_last_segment() {
        let place = Place::from_machine_id("Somewhere", "/g/11b6d8xq4_", "XYZ").unwrap();
        assert_eq!(place.code, "11b6d8xq4_");
    }

    #[test]
    fn reject_bad_machine_ids() {
        assert!(Place::from_machine_id("x", "", "X").is_err());
        assert!(Place::from_machine_id("x", "m/abc", "X").is_err());
        assert!(Place::from_machine_id("x", "/m/", "X").is_err());
    }

    #[test]
    fn display() {
        let route = Route::new(
            Place::new("Maceió", "03p3l7t", "MCZ"),
            Place::new("Santiago", "0dl6fv", "SCL"),
        );
        assert_eq!(route.to_string(), "Maceió (MCZ) -> Santiago (SCL)");
    }
}
