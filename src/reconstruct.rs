//! Reconstruction of annotations from trigger events.
//!
//! Block categories are delimited by a start and a stop trigger. Within one
//! category, starts and stops are sorted by sample and the k-th start is paired
//! with the k-th stop, which assumes occurrences of a category never overlap.
//! When the number of starts and stops differ the category is skipped as a
//! whole and reported in [`Reconstruction::skipped`].
//!
//! Instant categories have no stop trigger and get a fixed duration.
//!
//! # Output order
//!
//! Annotations are returned category by category, following
//! [`BLOCK_CATEGORIES`] then [`INSTANT_CATEGORIES`], and in ascending onset
//! within each category. They are not re-sorted by time across categories.
//!
//! # Example
//!
//! ```rust
//! use cardio_annotations::{reconstruct, TriggerTable, Annotation};
//!
//! let software = TriggerTable::new([
//!     ("sync_start", 10), ("sync_stop", 11),
//!     ("iso_start", 12), ("iso_stop", 13),
//!     ("async_start", 14), ("async_stop", 15),
//!     ("baseline_start", 16), ("baseline_stop", 17),
//!     ("pause", 18), ("resume", 19),
//!     ("sound", 20), ("omission", 21),
//!     ("percussion", 22), ("string", 23), ("wind", 24),
//! ]).unwrap();
//! let hardware = TriggerTable::new([("percussion", 1), ("string", 2), ("wind", 4)]).unwrap();
//!
//! let events = vec![(100u64, 10), (500, 11), (700, 20)];
//! let result = reconstruct(events, &software, &hardware, 100.0).unwrap();
//!
//! assert_eq!(result.annotations, vec![
//!     Annotation::new(1.0, 4.0, "Synchronous"),
//!     Annotation::new(7.0, 0.1, "Sound"),
//! ]);
//! assert!(result.is_complete());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;
use crate::triggers::{TriggerTable, HARDWARE_TRIGGER_NAMES, SOFTWARE_TRIGGER_NAMES};
use crate::types::{Annotation, BlockCategory, Event, InstantCategory, TriggerSource};
use crate::utils::{check_sample_rate, samples_to_seconds};

/// Duration of sound and omission annotations, in seconds.
pub const SOUND_DURATION: f64 = 0.1;
/// Duration of instrument stimulus annotations, in seconds.
pub const INSTRUMENT_DURATION: f64 = 0.4;
/// Duration of instrument response annotations, in seconds.
pub const RESPONSE_DURATION: f64 = 0.1;

/// Paired start/stop categories, in output order. The pause span comes last
/// and is labeled for exclusion.
pub const BLOCK_CATEGORIES: &[BlockCategory] = &[
    BlockCategory { label: "Synchronous", start: "sync_start", stop: "sync_stop" },
    BlockCategory { label: "Isochronous", start: "iso_start", stop: "iso_stop" },
    BlockCategory { label: "Asynchronous", start: "async_start", stop: "async_stop" },
    BlockCategory { label: "Baseline", start: "baseline_start", stop: "baseline_stop" },
    BlockCategory { label: "BAD_Pause", start: "pause", stop: "resume" },
];

/// Fixed-duration categories, in output order.
pub const INSTANT_CATEGORIES: &[InstantCategory] = &[
    InstantCategory { label: "Sound", trigger: "sound", source: TriggerSource::Software, duration: SOUND_DURATION },
    InstantCategory { label: "Omission", trigger: "omission", source: TriggerSource::Software, duration: SOUND_DURATION },
    InstantCategory { label: "Percussion", trigger: "percussion", source: TriggerSource::Software, duration: INSTRUMENT_DURATION },
    InstantCategory { label: "String", trigger: "string", source: TriggerSource::Software, duration: INSTRUMENT_DURATION },
    InstantCategory { label: "Wind", trigger: "wind", source: TriggerSource::Software, duration: INSTRUMENT_DURATION },
    InstantCategory { label: "R_Percussion", trigger: "percussion", source: TriggerSource::Hardware, duration: RESPONSE_DURATION },
    InstantCategory { label: "R_String", trigger: "string", source: TriggerSource::Hardware, duration: RESPONSE_DURATION },
    InstantCategory { label: "R_Wind", trigger: "wind", source: TriggerSource::Hardware, duration: RESPONSE_DURATION },
];

/// Why a block category produced no annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Different number of start and stop triggers.
    CountMismatch { starts: usize, stops: usize },
    /// After sorting, a stop precedes the start it is paired with.
    StopBeforeStart { start: u64, stop: u64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::CountMismatch { starts, stops } => {
                write!(f, "{} start(s) but {} stop(s)", starts, stops)
            }
            SkipReason::StopBeforeStart { start, stop } => {
                write!(f, "stop at sample {} precedes start at sample {}", stop, start)
            }
        }
    }
}

/// A block category left out of the output, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCategory {
    pub label: &'static str,
    pub reason: SkipReason,
}

/// Output of [`reconstruct`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconstruction {
    /// Annotations in category-major order.
    pub annotations: Vec<Annotation>,
    /// Block categories left out of `annotations`.
    pub skipped: Vec<SkippedCategory>,
}

impl Reconstruction {
    /// Number of annotations carrying `label`.
    pub fn count(&self, label: &str) -> usize {
        self.annotations
            .iter()
            .filter(|annotation| annotation.description == label)
            .count()
    }

    /// Distinct labels in emission order.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for annotation in &self.annotations {
            if labels.last() != Some(&annotation.description.as_str()) {
                labels.push(&annotation.description);
            }
        }
        labels
    }

    /// `true` when no category was skipped.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Drop the skip list and keep the annotations.
    pub fn into_annotations(self) -> Vec<Annotation> {
        self.annotations
    }
}

/// Rebuild annotations from trigger events.
///
/// `events` may come in any order. Trigger names are resolved against the
/// software table, except for response categories which use the hardware
/// table. Both tables and the sampling rate are checked before any event is
/// looked at: a missing trigger name or a non-positive sampling rate fails
/// the whole call. Block categories with unequal start and stop counts are
/// skipped, never an error.
pub fn reconstruct<I, E>(
    events: I,
    software: &TriggerTable,
    hardware: &TriggerTable,
    sample_rate: f64,
) -> Result<Reconstruction>
where
    I: IntoIterator<Item = E>,
    E: Into<Event>,
{
    check_sample_rate(sample_rate)?;
    software.require(SOFTWARE_TRIGGER_NAMES)?;
    hardware.require(HARDWARE_TRIGGER_NAMES)?;

    let samples = group_by_code(events);
    let samples_of = |code: i32| samples.get(&code).map(Vec::as_slice).unwrap_or(&[]);
    let mut result = Reconstruction::default();

    for category in BLOCK_CATEGORIES {
        let starts = samples_of(software.code(category.start)?);
        let stops = samples_of(software.code(category.stop)?);

        match pair_blocks(starts, stops) {
            Ok(pairs) => {
                result.annotations.extend(pairs.into_iter().map(|(start, stop)| {
                    Annotation::new(
                        samples_to_seconds(start, sample_rate),
                        samples_to_seconds(stop - start, sample_rate),
                        category.label,
                    )
                }));
            }
            Err(reason) => {
                log::warn!("Skipping '{}' annotations: {}", category.label, reason);
                result.skipped.push(SkippedCategory {
                    label: category.label,
                    reason,
                });
            }
        }
    }

    for category in INSTANT_CATEGORIES {
        let table = match category.source {
            TriggerSource::Software => software,
            TriggerSource::Hardware => hardware,
        };
        let onsets = samples_of(table.code(category.trigger)?);
        result.annotations.extend(onsets.iter().map(|&sample| {
            Annotation::new(
                samples_to_seconds(sample, sample_rate),
                category.duration,
                category.label,
            )
        }));
    }

    log::debug!(
        "Reconstructed {} annotations ({} categories skipped)",
        result.annotations.len(),
        result.skipped.len()
    );
    Ok(result)
}

/// Sample indices per code, each list sorted ascending.
fn group_by_code<I, E>(events: I) -> BTreeMap<i32, Vec<u64>>
where
    I: IntoIterator<Item = E>,
    E: Into<Event>,
{
    let mut samples: BTreeMap<i32, Vec<u64>> = BTreeMap::new();
    for event in events {
        let event = event.into();
        samples.entry(event.code).or_default().push(event.sample);
    }
    for list in samples.values_mut() {
        list.sort_unstable();
    }
    samples
}

fn pair_blocks(
    starts: &[u64],
    stops: &[u64],
) -> std::result::Result<Vec<(u64, u64)>, SkipReason> {
    // TODO: partial pairing of mismatched categories (nearest following stop)
    if starts.len() != stops.len() {
        return Err(SkipReason::CountMismatch {
            starts: starts.len(),
            stops: stops.len(),
        });
    }

    starts
        .iter()
        .zip(stops)
        .map(|(&start, &stop)| {
            if stop < start {
                Err(SkipReason::StopBeforeStart { start, stop })
            } else {
                Ok((start, stop))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_blocks() {
        assert_eq!(pair_blocks(&[], &[]), Ok(vec![]));
        assert_eq!(pair_blocks(&[1, 5], &[3, 9]), Ok(vec![(1, 3), (5, 9)]));
        assert_eq!(
            pair_blocks(&[1, 5], &[3]),
            Err(SkipReason::CountMismatch { starts: 2, stops: 1 })
        );
        assert_eq!(
            pair_blocks(&[10], &[4]),
            Err(SkipReason::StopBeforeStart { start: 10, stop: 4 })
        );
    }

    #[test]
    fn test_group_by_code_sorts_each_code() {
        let grouped = group_by_code(vec![(30u64, 1), (10, 2), (20, 1), (5, 1)]);
        assert_eq!(grouped[&1], vec![5, 20, 30]);
        assert_eq!(grouped[&2], vec![10]);
    }

    #[test]
    fn test_category_labels_are_distinct() {
        let mut labels: Vec<&str> = BLOCK_CATEGORIES
            .iter()
            .map(|c| c.label)
            .chain(INSTANT_CATEGORIES.iter().map(|c| c.label))
            .collect();
        let total = labels.len();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), total);
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::CountMismatch { starts: 2, stops: 1 };
        assert_eq!(reason.to_string(), "2 start(s) but 1 stop(s)");
    }
}
