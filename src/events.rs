//! Event extraction from an integer stim channel.

use std::collections::BTreeSet;

use crate::types::Event;

/// Which transitions between two non-zero values count as events.
///
/// A transition from 0 to a non-zero value is always an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Consecutive {
    /// Only transitions starting from 0.
    Off,
    /// Also transitions to a larger non-zero value.
    #[default]
    Increasing,
    /// Every transition to a non-zero value.
    All,
}

impl Consecutive {
    fn accepts(self, previous: i32, current: i32) -> bool {
        if current == 0 || current == previous {
            return false;
        }
        match self {
            Consecutive::Off => previous == 0,
            Consecutive::Increasing => previous == 0 || current > previous,
            Consecutive::All => true,
        }
    }
}

/// Scan a stim channel and return one [`Event`] per accepted transition, in
/// ascending sample order.
///
/// Negative values are read as their absolute value. Sample 0 only seeds the
/// previous value: a channel that starts in the middle of a pulse yields no
/// event for that pulse.
///
/// ```rust
/// use cardio_annotations::{find_events, Consecutive};
///
/// let channel = [0, 0, 5, 5, 0, 3, 7, 7, 2, 0];
/// let events = find_events(&channel, Consecutive::Increasing);
///
/// let codes: Vec<(u64, i32)> = events.iter().map(|e| (e.sample, e.code)).collect();
/// assert_eq!(codes, vec![(2, 5), (5, 3), (6, 7)]);
/// ```
pub fn find_events(channel: &[i32], consecutive: Consecutive) -> Vec<Event> {
    let mut events = Vec::new();
    let mut previous = channel.first().map_or(0, |value| value.saturating_abs());

    for (sample, &value) in channel.iter().enumerate().skip(1) {
        let value = value.saturating_abs();
        if consecutive.accepts(previous, value) {
            events.push(Event {
                sample: sample as u64,
                previous,
                code: value,
            });
        }
        previous = value;
    }

    log::debug!(
        "Found {} events in {} samples ({:?})",
        events.len(),
        channel.len(),
        consecutive
    );
    events
}

/// Distinct codes present in `events`, ascending.
pub fn codes_present(events: &[Event]) -> BTreeSet<i32> {
    events.iter().map(|event| event.code).collect()
}
