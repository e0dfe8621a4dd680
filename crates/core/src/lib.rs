//! Domain model and pure view logic for the Facewatch console.
//!
//! Everything in this crate is synchronous and free of I/O: record types
//! shared with the webhook gateway, timecode formatting, the status badge
//! table, dashboard/archive row derivation, the tagging reducer and the
//! training form.

pub mod error;
pub mod status;
pub mod tagging;
pub mod timecode;
pub mod training;
pub mod validation;
pub mod video;
pub mod view;
