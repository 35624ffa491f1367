//! Semitone transposition of single events and event sequences.

use pitch::{normalize_root, to_note_number, NoteRef, OCTAVE};
use tracing::{debug, trace};

use crate::event::{ChordEvent, Event, KeyEvent, NoteEvent, Pedal};

/// Transpose one event by `offset` semitones, returning a new event.
///
/// Notes are shifted as absolute note numbers and come back numeric even
/// if they went in spelled. Chord and key roots are folded onto `0..12`
/// both before and after the shift, so an offset of zero still normalizes
/// an out-of-range root. Other event types are returned unchanged.
///
/// A chord's pedal is recomputed from the already-shifted root, not from
/// the pedal's own value. Falsy pedals ([`Pedal::Unset`], such as a wire
/// `0`) are left exactly as they were.
///
/// Note numbers saturate at the `i32` bounds. Decoded notes are bounded so
/// that offsets within `±MAX_SEMITONES` never reach them.
///
/// Drum-kit note names are not treated specially, and key roots carry no
/// sharp/flat spelling.
pub fn transpose_event(offset: i32, event: &Event) -> Event {
    match event {
        Event::Note(note) => Event::Note(NoteEvent {
            pitch: NoteRef::Number(to_note_number(&note.pitch).saturating_add(offset)),
            ..note.clone()
        }),
        Event::Chord(chord) => {
            let root = shift_root(chord.root, offset);
            let pedal = match &chord.pedal {
                Pedal::Note(_) => Pedal::Note(shift_root(root, offset)),
                unchanged => unchanged.clone(),
            };
            Event::Chord(ChordEvent {
                root,
                pedal,
                ..chord.clone()
            })
        }
        Event::Key(key) => Event::Key(KeyEvent {
            root: shift_root(key.root, offset),
            ..key.clone()
        }),
        Event::Other(other) => {
            trace!(kind = %other.kind, "event has no pitch, passing through");
            event.clone()
        }
    }
}

/// `normalize_root(normalize_root(root) + offset)`, widened so no offset overflows.
fn shift_root(root: i32, offset: i32) -> i32 {
    (i64::from(normalize_root(root)) + i64::from(offset)).rem_euclid(i64::from(OCTAVE)) as i32
}

/// Transpose every event, preserving length and order.
pub fn transpose(offset: i32, events: &[Event]) -> Vec<Event> {
    debug!(offset, count = events.len(), "transposing events");
    events
        .iter()
        .map(|event| transpose_event(offset, event))
        .collect()
}

/// Transpose every event of a buffer the caller owns.
pub fn transpose_in_place(offset: i32, events: &mut [Event]) {
    debug!(offset, count = events.len(), "transposing events in place");
    for event in events.iter_mut() {
        *event = transpose_event(offset, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn note_number(event: &Event) -> i32 {
        match event {
            Event::Note(note) => to_note_number(&note.pitch),
            other => panic!("expected note, got {other:?}"),
        }
    }

    #[test]
    fn note_is_shifted_not_folded() {
        assert_eq!(transpose_event(2, &Event::note(0, 60)), Event::note(0, 62));
        assert_eq!(transpose_event(-70, &Event::note(0, 60)), Event::note(0, -10));
        assert_eq!(transpose_event(100, &Event::note(0, 60)), Event::note(0, 160));
    }

    #[test]
    fn spelled_note_comes_back_numeric() {
        let name: NoteRef = "C4".parse().unwrap();
        assert_eq!(transpose_event(2, &Event::note(0, name)), Event::note(0, 62));
    }

    #[test]
    fn note_transposition_is_additive() {
        let event = Event::note(0, 57);
        for (a, b) in [(3, 4), (-12, 5), (0, 0), (7, -7)] {
            let twice = transpose_event(a, &transpose_event(b, &event));
            assert_eq!(note_number(&twice), 57 + a + b);
        }
    }

    #[test]
    fn chord_root_is_folded() {
        let shifted = transpose_event(1, &Event::chord(0, 13, "∆", 4, None));
        assert_eq!(shifted, Event::chord(0, 2, "∆", 4, None));
    }

    #[test]
    fn key_root_wraps_below_zero() {
        assert_eq!(transpose_event(-1, &Event::key(0, 0)), Event::key(0, 11));
    }

    #[test]
    fn zero_offset_still_normalizes_roots() {
        assert_eq!(transpose_event(0, &Event::key(0, 13)), Event::key(0, 1));
        assert_eq!(
            transpose_event(0, &Event::chord(0, 13, "-", 1, None)),
            Event::chord(0, 1, "-", 1, None)
        );
    }

    // Pinned: the pedal is derived from the shifted root, which shifts it
    // twice relative to the original root and ignores the old pedal value.
    // Changing this must be a deliberate decision.
    #[test]
    fn chord_pedal_follows_shifted_root() {
        for (root, pedal, n) in [(0, 7, 2), (11, 4, 3), (5, 2, -8), (13, 9, 12)] {
            let shifted = transpose_event(n, &Event::chord(0, root, "7", 2, Some(pedal)));
            let expected_root = normalize_root(normalize_root(root) + n);
            let expected_pedal = normalize_root(normalize_root(expected_root) + n);
            assert_eq!(shifted, Event::chord(0, expected_root, "7", 2, Some(expected_pedal)));
        }

        // C chord over G, up a tone: root D, pedal E (not A).
        let shifted = transpose_event(2, &Event::chord(0, 0, "∆", 4, Some(7)));
        assert_eq!(shifted, Event::chord(0, 2, "∆", 4, Some(4)));
    }

    #[test]
    fn falsy_pedal_is_not_transposed() {
        let raw = vec![json!(0), json!("chord"), json!(7), json!("7"), json!(1), json!(0)];
        let chord = Event::try_from(raw).unwrap();
        let shifted: Vec<Value> = transpose_event(2, &chord).into();
        assert_eq!(Value::Array(shifted), json!([0, "chord", 9, "7", 1, 0]));

        for unset in [json!(false), json!(null)] {
            let mut chord = Event::chord(0, 7, "7", 1, None);
            if let Event::Chord(c) = &mut chord {
                c.pedal = Pedal::Unset(unset.clone());
            }
            match transpose_event(5, &chord) {
                Event::Chord(c) => {
                    assert_eq!(c.root, 0);
                    assert_eq!(c.pedal, Pedal::Unset(unset));
                }
                other => panic!("expected chord, got {other:?}"),
            }
        }
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        assert_eq!(transpose_event(1, &Event::note(0, i32::MAX)), Event::note(0, i32::MAX));
        assert_eq!(transpose_event(-1, &Event::note(0, i32::MIN)), Event::note(0, i32::MIN));

        let shifted = transpose_event(i32::MAX, &Event::chord(0, 11, "7", 1, Some(3)));
        let root = normalize_root(11 + normalize_root(i32::MAX));
        let pedal = normalize_root(root + normalize_root(i32::MAX));
        assert_eq!(shifted, Event::chord(0, root, "7", 1, Some(pedal)));
        assert_eq!(
            transpose_event(i32::MIN, &Event::key(0, 0)),
            Event::key(0, normalize_root(i32::MIN))
        );
    }

    #[test]
    fn absent_pedal_stays_absent() {
        let shifted = transpose_event(5, &Event::chord(0, 3, "-", 1, None));
        assert_eq!(shifted, Event::chord(0, 8, "-", 1, None));
    }

    #[test]
    fn unknown_types_are_identity() {
        let lyric = Event::other(0, "lyric", vec![json!("hello")]);
        for n in [-24, -1, 0, 1, 7, 24] {
            assert_eq!(transpose_event(n, &lyric), lyric);
        }
    }

    #[test]
    fn untouched_positions_survive() {
        let mut note = Event::note(1, 64);
        if let Event::Note(n) = &mut note {
            n.tail = vec![json!(0.5), json!(2)];
        }
        match transpose_event(-4, &note) {
            Event::Note(n) => {
                assert_eq!(n.time, serde_json::Number::from(1));
                assert_eq!(n.tail, vec![json!(0.5), json!(2)]);
                assert_eq!(to_note_number(&n.pitch), 60);
            }
            other => panic!("expected note, got {other:?}"),
        }
    }

    #[test]
    fn input_event_is_left_untouched() {
        let chord = Event::chord(0, 4, "7", 1, Some(11));
        let before = chord.clone();
        let _ = transpose_event(3, &chord);
        assert_eq!(chord, before);
    }

    #[test]
    fn sequence_preserves_length_and_order() {
        let events = vec![
            Event::note(0, 60),
            Event::chord(1, 13, "∆", 4, None),
            Event::key(2, 0),
            Event::other(3, "lyric", vec![json!("hello")]),
        ];

        let shifted = transpose(1, &events);

        assert_eq!(shifted.len(), events.len());
        for (input, output) in events.iter().zip(&shifted) {
            assert_eq!(output.kind(), input.kind());
            assert_eq!(output.time(), input.time());
            assert_eq!(*output, transpose_event(1, input));
        }
    }

    #[test]
    fn empty_sequence() {
        assert!(transpose(7, &[]).is_empty());
    }

    #[test]
    fn in_place_matches_copying_transpose() {
        let events = vec![
            Event::note(0, "Eb3".parse::<NoteRef>().unwrap()),
            Event::chord(0, 9, "-", 2, Some(4)),
            Event::key(0, 10),
        ];
        let copied = transpose(-5, &events);

        let mut buffer = events.clone();
        transpose_in_place(-5, &mut buffer);
        assert_eq!(buffer, copied);
    }
}
