//! Note numbers, root numbers, and note-name spelling.
//!
//! Two conversions sit at the bottom of every transposition:
//!
//! - [`normalize_root`] folds any integer onto its pitch class (`0..12`).
//! - [`to_note_number`] turns a numeric or spelled note into an absolute
//!   note number, with middle C (`C4`) at 60.
//!
//! # Example
//!
//! ```
//! use pitch::{normalize_root, to_note_number, NoteRef};
//!
//! assert_eq!(normalize_root(13), 1);
//! assert_eq!(normalize_root(-1), 11);
//!
//! let note: NoteRef = "Bb3".parse().unwrap();
//! assert_eq!(to_note_number(&note), 58);
//! ```

pub mod name;
pub mod number;

pub use name::{Accidental, Letter, NoteName, OCTAVES};
pub use number::{normalize_root, note_name, root_from_name, to_note_number, NoteRef};

/// Number of pitch classes in an octave.
pub const OCTAVE: i32 = 12;

/// Errors from parsing spelled notes and roots.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PitchError {
    #[error("empty note name")]
    EmptyName,

    #[error("'{0}' is not a note letter (A-G)")]
    InvalidLetter(char),

    #[error("invalid accidental in '{0}'")]
    InvalidAccidental(String),

    #[error("invalid octave in '{0}'")]
    InvalidOctave(String),

    #[error("note name '{0}' has no octave")]
    MissingOctave(String),

    #[error("root name '{0}' must not carry an octave")]
    UnexpectedOctave(String),
}

pub type Result<T> = std::result::Result<T, PitchError>;
