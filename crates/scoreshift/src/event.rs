//! Typed events and their positional JSON layout.
//!
//! ```text
//! [time, "note",  pitch, ...tail]
//! [time, "chord", root, mode, duration, pedal?, ...tail]
//! [time, "key",   root, ...tail]
//! [time, <other>, ...data]
//! ```
//!
//! Pitches may be integers or spelled names (`"C4"`, `"Bb"`). Positions the
//! core does not model are carried verbatim in `tail`/`data`.

use pitch::{root_from_name, NoteName, NoteRef};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::config::MAX_SEMITONES;
use crate::{EventError, Result};

pub const NOTE: &str = "note";
pub const CHORD: &str = "chord";
pub const KEY: &str = "key";

/// Positions shared by every layout.
const TIME: usize = 0;
const TYPE: usize = 1;
/// First type-specific position.
const PITCH: usize = 2;
const CHORD_MODE: usize = 3;
const CHORD_DURATION: usize = 4;
const CHORD_PEDAL: usize = 5;

/// Largest note number magnitude accepted on decode, leaving room for any
/// offset up to [`MAX_SEMITONES`] in either direction.
pub const MAX_NOTE_NUMBER: i32 = i32::MAX - MAX_SEMITONES;

/// A single note.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEvent {
    pub time: Number,
    pub pitch: NoteRef,
    /// Velocity, duration, and anything after them.
    pub tail: Vec<Value>,
}

/// A chord symbol with an optional pedal (bass) note.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordEvent {
    pub time: Number,
    /// Root pitch class; folded onto `0..12` by transposition.
    pub root: i32,
    pub mode: String,
    pub duration: Number,
    pub pedal: Pedal,
    pub tail: Vec<Value>,
}

/// Position 5 of a chord.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Pedal {
    /// Not written.
    #[default]
    Absent,
    /// A falsy placeholder (`false`, `null`, `0`, `""`), written back as-is
    /// and never transposed.
    Unset(Value),
    /// A pedal pitch class.
    Note(i32),
}

impl Pedal {
    /// Pitch class of a pedal that takes part in transposition.
    pub fn note(&self) -> Option<i32> {
        match self {
            Pedal::Note(pc) => Some(*pc),
            Pedal::Absent | Pedal::Unset(_) => None,
        }
    }
}

impl From<Option<i32>> for Pedal {
    fn from(pedal: Option<i32>) -> Self {
        pedal.map_or(Pedal::Absent, Pedal::Note)
    }
}

/// A key signature marker.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    pub time: Number,
    pub root: i32,
    pub tail: Vec<Value>,
}

/// Any event type without pitch content.
#[derive(Debug, Clone, PartialEq)]
pub struct OtherEvent {
    pub time: Number,
    pub kind: String,
    pub data: Vec<Value>,
}

/// One timed event, dispatched on its type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", into = "Vec<Value>")]
pub enum Event {
    Note(NoteEvent),
    Chord(ChordEvent),
    Key(KeyEvent),
    Other(OtherEvent),
}

impl Event {
    pub fn note(time: impl Into<Number>, pitch: impl Into<NoteRef>) -> Self {
        Event::Note(NoteEvent {
            time: time.into(),
            pitch: pitch.into(),
            tail: Vec::new(),
        })
    }

    pub fn chord(
        time: impl Into<Number>,
        root: i32,
        mode: impl Into<String>,
        duration: impl Into<Number>,
        pedal: Option<i32>,
    ) -> Self {
        Event::Chord(ChordEvent {
            time: time.into(),
            root,
            mode: mode.into(),
            duration: duration.into(),
            pedal: pedal.into(),
            tail: Vec::new(),
        })
    }

    pub fn key(time: impl Into<Number>, root: i32) -> Self {
        Event::Key(KeyEvent {
            time: time.into(),
            root,
            tail: Vec::new(),
        })
    }

    pub fn other(time: impl Into<Number>, kind: impl Into<String>, data: Vec<Value>) -> Self {
        Event::Other(OtherEvent {
            time: time.into(),
            kind: kind.into(),
            data,
        })
    }

    /// The type tag at position 1.
    pub fn kind(&self) -> &str {
        match self {
            Event::Note(_) => NOTE,
            Event::Chord(_) => CHORD,
            Event::Key(_) => KEY,
            Event::Other(other) => &other.kind,
        }
    }

    pub fn time(&self) -> &Number {
        match self {
            Event::Note(e) => &e.time,
            Event::Chord(e) => &e.time,
            Event::Key(e) => &e.time,
            Event::Other(e) => &e.time,
        }
    }
}

/// Decode a JSON array of positional events.
pub fn decode_events(json: &str) -> Result<Vec<Event>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(EventError::NotASequence);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let decoded = match item {
                Value::Array(fields) => Event::try_from(fields),
                _ => Err(EventError::NotAnArray),
            };
            decoded.map_err(|e| EventError::AtIndex {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

/// Encode events back into their positional layout.
pub fn encode_events(events: &[Event]) -> Value {
    Value::Array(
        events
            .iter()
            .cloned()
            .map(|event| Value::Array(event.into()))
            .collect(),
    )
}

impl TryFrom<Vec<Value>> for Event {
    type Error = EventError;

    fn try_from(fields: Vec<Value>) -> Result<Self> {
        let mut fields = fields.into_iter();

        let time = match fields.next() {
            Some(Value::Number(n)) => n,
            Some(_) => return Err(invalid("event", TIME, "time must be a number")),
            None => {
                return Err(EventError::Missing {
                    kind: "event",
                    position: TIME,
                })
            }
        };
        let kind = match fields.next() {
            Some(Value::String(s)) => s,
            Some(_) => return Err(invalid("event", TYPE, "type tag must be a string")),
            None => {
                return Err(EventError::Missing {
                    kind: "event",
                    position: TYPE,
                })
            }
        };

        match kind.as_str() {
            NOTE => Ok(Event::Note(NoteEvent {
                time,
                pitch: decode_note(fields.next())?,
                tail: fields.collect(),
            })),
            CHORD => Ok(Event::Chord(ChordEvent {
                time,
                root: decode_root(CHORD, PITCH, fields.next())?,
                mode: match fields.next() {
                    Some(Value::String(s)) => s,
                    Some(_) => return Err(invalid(CHORD, CHORD_MODE, "mode must be a string")),
                    None => {
                        return Err(EventError::Missing {
                            kind: CHORD,
                            position: CHORD_MODE,
                        })
                    }
                },
                duration: match fields.next() {
                    Some(Value::Number(n)) => n,
                    Some(_) => {
                        return Err(invalid(CHORD, CHORD_DURATION, "duration must be a number"))
                    }
                    None => {
                        return Err(EventError::Missing {
                            kind: CHORD,
                            position: CHORD_DURATION,
                        })
                    }
                },
                pedal: decode_pedal(fields.next())?,
                tail: fields.collect(),
            })),
            KEY => Ok(Event::Key(KeyEvent {
                time,
                root: decode_root(KEY, PITCH, fields.next())?,
                tail: fields.collect(),
            })),
            _ => Ok(Event::Other(OtherEvent {
                time,
                kind,
                data: fields.collect(),
            })),
        }
    }
}

impl From<Event> for Vec<Value> {
    fn from(event: Event) -> Vec<Value> {
        match event {
            Event::Note(note) => {
                let pitch = match note.pitch {
                    NoteRef::Number(n) => Value::from(n),
                    NoteRef::Name(name) => Value::from(name.to_string()),
                };
                let mut fields = vec![Value::Number(note.time), Value::from(NOTE), pitch];
                fields.extend(note.tail);
                fields
            }
            Event::Chord(chord) => {
                let mut fields = vec![
                    Value::Number(chord.time),
                    Value::from(CHORD),
                    Value::from(chord.root),
                    Value::from(chord.mode),
                    Value::Number(chord.duration),
                ];
                match chord.pedal {
                    Pedal::Note(pc) => fields.push(Value::from(pc)),
                    Pedal::Unset(value) => fields.push(value),
                    Pedal::Absent if !chord.tail.is_empty() => fields.push(Value::Null),
                    Pedal::Absent => {}
                }
                fields.extend(chord.tail);
                fields
            }
            Event::Key(key) => {
                let mut fields = vec![Value::Number(key.time), Value::from(KEY), Value::from(key.root)];
                fields.extend(key.tail);
                fields
            }
            Event::Other(other) => {
                let mut fields = vec![Value::Number(other.time), Value::from(other.kind)];
                fields.extend(other.data);
                fields
            }
        }
    }
}

fn invalid(kind: &'static str, position: usize, reason: impl Into<String>) -> EventError {
    EventError::Invalid {
        kind,
        position,
        reason: reason.into(),
    }
}

fn decode_int(kind: &'static str, position: usize, n: &Number) -> Result<i32> {
    n.as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| invalid(kind, position, format!("{} is not a whole number", n)))
}

fn decode_note(value: Option<Value>) -> Result<NoteRef> {
    match value {
        Some(Value::Number(n)) => {
            let number = decode_int(NOTE, PITCH, &n)?;
            if !(-MAX_NOTE_NUMBER..=MAX_NOTE_NUMBER).contains(&number) {
                return Err(invalid(
                    NOTE,
                    PITCH,
                    format!("note number {number} is outside ±{MAX_NOTE_NUMBER}"),
                ));
            }
            Ok(NoteRef::Number(number))
        }
        Some(Value::String(s)) => s
            .parse::<NoteName>()
            .map(NoteRef::Name)
            .map_err(|source| EventError::Pitch {
                kind: NOTE,
                position: PITCH,
                source,
            }),
        Some(_) => Err(invalid(NOTE, PITCH, "pitch must be a number or note name")),
        None => Err(EventError::Missing {
            kind: NOTE,
            position: PITCH,
        }),
    }
}

fn decode_root(kind: &'static str, position: usize, value: Option<Value>) -> Result<i32> {
    match value {
        Some(Value::Number(n)) => decode_int(kind, position, &n),
        Some(Value::String(s)) => {
            root_from_name(&s).map_err(|source| EventError::Pitch {
                kind,
                position,
                source,
            })
        }
        Some(_) => Err(invalid(kind, position, "root must be a number or root name")),
        None => Err(EventError::Missing { kind, position }),
    }
}

/// Falsy pedals are kept verbatim; anything else must be a root.
fn decode_pedal(value: Option<Value>) -> Result<Pedal> {
    match value {
        None => Ok(Pedal::Absent),
        Some(v) if is_falsy(&v) => Ok(Pedal::Unset(v)),
        Some(v) => decode_root(CHORD, CHORD_PEDAL, Some(v)).map(Pedal::Note),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
