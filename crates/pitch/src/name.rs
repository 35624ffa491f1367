//! Spelled notes: letter, accidental, octave.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{PitchError, Result, OCTAVE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// Semitone offset from C (0-11)
    pub fn to_semitone(&self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// Parse a single letter (case-insensitive)
    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    fn as_char(&self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Accidental {
    DoubleFlat,
    Flat,
    #[default]
    Natural,
    Sharp,
    DoubleSharp,
}

impl Accidental {
    pub fn to_semitone_offset(&self) -> i32 {
        match self {
            Accidental::DoubleFlat => -2,
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::DoubleSharp => 2,
        }
    }

    fn from_offset(offset: i32) -> Option<Accidental> {
        match offset {
            -2 => Some(Accidental::DoubleFlat),
            -1 => Some(Accidental::Flat),
            0 => Some(Accidental::Natural),
            1 => Some(Accidental::Sharp),
            2 => Some(Accidental::DoubleSharp),
            _ => None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Accidental::DoubleFlat => "bb",
            Accidental::Flat => "b",
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::DoubleSharp => "##",
        }
    }
}

/// Split a spelling like `"F#3"` into letter, accidental, and the remainder.
///
/// Accepts `#`/`♯`, `b`/`♭`, `x`/`𝄪` and `𝄫`. Sharps and flats may not be
/// mixed, and the total alteration is bounded to a double accidental.
pub(crate) fn split_spelling(s: &str) -> Result<(Letter, Accidental, &str)> {
    let trimmed = s.trim();
    let mut chars = trimmed.char_indices();
    let (_, first) = chars.next().ok_or(PitchError::EmptyName)?;
    let letter = Letter::from_char(first).ok_or(PitchError::InvalidLetter(first))?;

    let mut offset = 0;
    let mut sharps = false;
    let mut flats = false;
    let mut rest = &trimmed[first.len_utf8()..];
    for (idx, c) in chars {
        let step = match c {
            '#' | '♯' => 1,
            'b' | '♭' => -1,
            'x' | '𝄪' => 2,
            '𝄫' => -2,
            _ => {
                rest = &trimmed[idx..];
                break;
            }
        };
        sharps |= step > 0;
        flats |= step < 0;
        offset += step;
        rest = &trimmed[idx + c.len_utf8()..];
    }

    if sharps && flats {
        return Err(PitchError::InvalidAccidental(s.to_string()));
    }
    let accidental =
        Accidental::from_offset(offset).ok_or_else(|| PitchError::InvalidAccidental(s.to_string()))?;

    Ok((letter, accidental, rest))
}

/// Octaves accepted when parsing a spelled note.
pub const OCTAVES: RangeInclusive<i32> = -10..=20;

/// A spelled absolute note such as `C4`, `F#3` or `Bb-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteName {
    pub letter: Letter,
    pub accidental: Accidental,
    pub octave: i32,
}

impl NoteName {
    pub fn new(letter: Letter, accidental: Accidental, octave: i32) -> Self {
        NoteName {
            letter,
            accidental,
            octave,
        }
    }

    /// Absolute note number, C4 = 60.
    ///
    /// Parsed names stay within [`OCTAVES`]; hand-built ones far outside it
    /// overflow.
    pub fn number(&self) -> i32 {
        (self.octave + 1) * OCTAVE + self.letter.to_semitone() + self.accidental.to_semitone_offset()
    }
}

impl FromStr for NoteName {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<Self> {
        let (letter, accidental, rest) = split_spelling(s)?;
        if rest.is_empty() {
            return Err(PitchError::MissingOctave(s.to_string()));
        }
        let octave = rest
            .parse::<i32>()
            .ok()
            .filter(|octave| OCTAVES.contains(octave))
            .ok_or_else(|| PitchError::InvalidOctave(s.to_string()))?;
        Ok(NoteName::new(letter, accidental, octave))
    }
}

impl TryFrom<String> for NoteName {
    type Error = PitchError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<NoteName> for String {
    fn from(name: NoteName) -> String {
        name.to_string()
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.letter.as_char(),
            self.accidental.symbol(),
            self.octave
        )
    }
}
