//! Round-trip flight fare search.
//!
//! A library and command-line driver that answers: "what is the cheapest
//! round trip of this length between these two places, departing in this
//! date span, and which flights make up that fare?"

pub mod domain;
pub mod flights;
pub mod planner;
