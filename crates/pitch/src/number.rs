//! Root numbers and absolute note numbers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::name::{split_spelling, Accidental, Letter, NoteName};
use crate::{PitchError, Result, OCTAVE};

/// Fold any integer onto its pitch class in `0..12`.
///
/// Total and idempotent: `normalize_root(normalize_root(x)) == normalize_root(x)`.
pub fn normalize_root(pitch_class: i32) -> i32 {
    pitch_class.rem_euclid(OCTAVE)
}

/// Pitch class of a root name such as `"C"`, `"Eb"` or `"F#"`.
pub fn root_from_name(name: &str) -> Result<i32> {
    let (letter, accidental, rest) = split_spelling(name)?;
    if !rest.is_empty() {
        return Err(PitchError::UnexpectedOctave(name.to_string()));
    }
    Ok(normalize_root(
        letter.to_semitone() + accidental.to_semitone_offset(),
    ))
}

/// Sharp-spelled name for an absolute note number.
pub fn note_name(number: i32) -> NoteName {
    let octave = number.div_euclid(OCTAVE) - 1;
    let (letter, accidental) = match normalize_root(number) {
        0 => (Letter::C, Accidental::Natural),
        1 => (Letter::C, Accidental::Sharp),
        2 => (Letter::D, Accidental::Natural),
        3 => (Letter::D, Accidental::Sharp),
        4 => (Letter::E, Accidental::Natural),
        5 => (Letter::F, Accidental::Natural),
        6 => (Letter::F, Accidental::Sharp),
        7 => (Letter::G, Accidental::Natural),
        8 => (Letter::G, Accidental::Sharp),
        9 => (Letter::A, Accidental::Natural),
        10 => (Letter::A, Accidental::Sharp),
        _ => (Letter::B, Accidental::Natural),
    };
    NoteName::new(letter, accidental, octave)
}

/// A note given either as a number or as a spelled name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteRef {
    Number(i32),
    Name(NoteName),
}

impl From<i32> for NoteRef {
    fn from(number: i32) -> Self {
        NoteRef::Number(number)
    }
}

impl From<NoteName> for NoteRef {
    fn from(name: NoteName) -> Self {
        NoteRef::Name(name)
    }
}

impl FromStr for NoteRef {
    type Err = PitchError;

    /// Integers parse as numbers, anything else as a note name.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().parse::<i32>() {
            Ok(number) => Ok(NoteRef::Number(number)),
            Err(_) => Ok(NoteRef::Name(s.parse()?)),
        }
    }
}

impl fmt::Display for NoteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteRef::Number(n) => write!(f, "{}", n),
            NoteRef::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Absolute note number of a numeric or spelled note.
///
/// Numbers pass through unchanged, so the conversion is idempotent on its
/// own output.
pub fn to_note_number(note: &NoteRef) -> i32 {
    match note {
        NoteRef::Number(n) => *n,
        NoteRef::Name(name) => name.number(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_root_wraps_both_directions() {
        assert_eq!(normalize_root(0), 0);
        assert_eq!(normalize_root(11), 11);
        assert_eq!(normalize_root(12), 0);
        assert_eq!(normalize_root(13), 1);
        assert_eq!(normalize_root(-1), 11);
        assert_eq!(normalize_root(-13), 11);
        assert_eq!(normalize_root(60), 0);
    }

    #[test]
    fn normalize_root_is_idempotent() {
        for x in -30..30 {
            assert_eq!(normalize_root(normalize_root(x)), normalize_root(x));
        }
    }

    #[test]
    fn root_names() {
        assert_eq!(root_from_name("C").unwrap(), 0);
        assert_eq!(root_from_name("Eb").unwrap(), 3);
        assert_eq!(root_from_name("F#").unwrap(), 6);
        assert_eq!(root_from_name("Cb").unwrap(), 11);
        assert_eq!(root_from_name("B#").unwrap(), 0);
        assert_eq!(
            root_from_name("C4"),
            Err(PitchError::UnexpectedOctave("C4".to_string()))
        );
    }

    #[test]
    fn note_name_spells_with_sharps() {
        assert_eq!(note_name(60).to_string(), "C4");
        assert_eq!(note_name(61).to_string(), "C#4");
        assert_eq!(note_name(0).to_string(), "C-1");
        assert_eq!(note_name(-1).to_string(), "B-2");
        assert_eq!(note_name(127).to_string(), "G9");
    }

    #[test]
    fn note_name_round_trips_through_number() {
        for n in -24..140 {
            assert_eq!(note_name(n).number(), n);
        }
    }

    #[test]
    fn to_note_number_accepts_numbers_and_names() {
        assert_eq!(to_note_number(&NoteRef::Number(64)), 64);
        assert_eq!(to_note_number(&"A4".parse().unwrap()), 69);
        assert_eq!(to_note_number(&"62".parse().unwrap()), 62);
    }

    #[test]
    fn to_note_number_is_idempotent_on_output() {
        let once = to_note_number(&"G#2".parse().unwrap());
        assert_eq!(to_note_number(&NoteRef::Number(once)), once);
    }

    #[test]
    fn note_ref_serde_accepts_either_form() {
        let number: NoteRef = serde_json::from_str("60").unwrap();
        assert_eq!(number, NoteRef::Number(60));

        let name: NoteRef = serde_json::from_str("\"D#5\"").unwrap();
        assert_eq!(to_note_number(&name), 75);

        assert_eq!(serde_json::to_string(&name).unwrap(), "\"D#5\"");
        assert!(serde_json::from_str::<NoteRef>("\"Q1\"").is_err());
    }
}
