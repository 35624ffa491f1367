//! Transpose note, chord, and key events by a semitone offset.
//!
//! Events are typed ([`Event`]) and travel as positional JSON arrays,
//! `[time, type, ...]`. Transposition dispatches on the event type:
//!
//! - `note`: the absolute note number is shifted, never folded.
//! - `chord`: the root is shifted and folded onto `0..12`; a pedal, when set,
//!   is recomputed from the shifted root. Falsy pedals such as `0` stay put.
//! - `key`: the root is shifted and folded onto `0..12`.
//! - anything else passes through unchanged.
//!
//! # Example
//!
//! ```
//! use scoreshift::{decode_events, encode_events, transpose};
//!
//! let events = decode_events(r#"[[0, "note", "C4", 1, 0.5], [0, "key", "Eb"]]"#).unwrap();
//! let shifted = transpose(2, &events);
//! assert_eq!(
//!     encode_events(&shifted).to_string(),
//!     r#"[[0,"note",62,1,0.5],[0,"key",5]]"#
//! );
//! ```

pub mod config;
pub mod event;
pub mod transpose;

pub use config::{ConfigError, ConfigSources, ShiftConfig};
pub use event::{
    decode_events, encode_events, ChordEvent, Event, KeyEvent, NoteEvent, OtherEvent, Pedal,
};
pub use transpose::{transpose, transpose_event, transpose_in_place};

pub use pitch::{NoteName, NoteRef, PitchError};

/// Errors from decoding events out of their positional layout.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("expected a JSON array of events")]
    NotASequence,

    #[error("event is not an array")]
    NotAnArray,

    #[error("{kind} event is missing position {position}")]
    Missing { kind: &'static str, position: usize },

    #[error("{kind} event has invalid position {position}: {reason}")]
    Invalid {
        kind: &'static str,
        position: usize,
        reason: String,
    },

    #[error("{kind} event has unreadable pitch at position {position}: {source}")]
    Pitch {
        kind: &'static str,
        position: usize,
        #[source]
        source: PitchError,
    },

    #[error("event {index}: {source}")]
    AtIndex {
        index: usize,
        #[source]
        source: Box<EventError>,
    },

    #[error("events are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EventError>;
