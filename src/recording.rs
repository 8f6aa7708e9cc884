use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};

use crate::error::{AnnotationError, Result};
use crate::events::{find_events, Consecutive};
use crate::reconstruct::{reconstruct, Reconstruction};
use crate::triggers::TriggerTable;
use crate::types::{Annotation, Event};
use crate::utils::check_sample_rate;

/// Name of the stim channel written by the recorder.
pub const DEFAULT_STIM_CHANNEL: &str = "TRIGGER";

/// An in-memory recording: sampling rate, integer stim channels and an
/// append-only annotation list.
///
/// Reading the file and mapping auxiliary channels happens before a
/// `Recording` is built; only what annotation reconstruction needs lives here.
///
/// # Examples
///
/// ```rust
/// use cardio_annotations::{Recording, TriggerTable, Annotation};
///
/// let software = TriggerTable::from_ini_str("
///     sync_start = 1
///     sync_stop = 2
///     iso_start = 3
///     iso_stop = 4
///     async_start = 5
///     async_stop = 6
///     baseline_start = 7
///     baseline_stop = 8
///     pause = 9
///     resume = 10
///     sound = 11
///     omission = 12
///     percussion = 13
///     string = 14
///     wind = 15
/// ").unwrap();
/// let hardware = TriggerTable::from_ini_str("percussion = 16\nstring = 32\nwind = 64").unwrap();
///
/// let mut trigger = vec![0; 1000];
/// trigger[200] = 9;   // pause
/// trigger[600] = 10;  // resume
/// trigger[800] = 11;  // sound
///
/// let mut recording = Recording::new(100.0).unwrap();
/// recording.add_stim_channel("TRIGGER", trigger);
/// recording.extend_annotations([Annotation::new(0.0, 0.0, "Recording start")]);
///
/// let result = recording.add_annotations_from_events(&software, &hardware).unwrap();
/// assert_eq!(result.annotations.len(), 2);
///
/// let annotations = recording.annotations();
/// assert_eq!(annotations.len(), 3);
/// assert_eq!(annotations[0].description, "Recording start");
/// assert_eq!(annotations[1], Annotation::new(2.0, 4.0, "BAD_Pause"));
/// assert_eq!(annotations[2], Annotation::new(8.0, 0.1, "Sound"));
/// ```
#[derive(Debug, Clone)]
pub struct Recording {
    sample_rate: f64,
    meas_date: Option<NaiveDateTime>,
    stim_channels: BTreeMap<String, Vec<i32>>,
    annotations: Vec<Annotation>,
}

impl Recording {
    /// Create an empty recording. Fails if `sample_rate` is not a positive,
    /// finite number.
    pub fn new(sample_rate: f64) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        Ok(Self {
            sample_rate,
            meas_date: None,
            stim_channels: BTreeMap::new(),
            annotations: Vec::new(),
        })
    }

    /// Set the wall-clock time of the first sample.
    pub fn with_meas_date(mut self, meas_date: NaiveDateTime) -> Self {
        self.meas_date = Some(meas_date);
        self
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn meas_date(&self) -> Option<NaiveDateTime> {
        self.meas_date
    }

    /// Add or replace a stim channel.
    pub fn add_stim_channel(&mut self, name: impl Into<String>, data: Vec<i32>) {
        self.stim_channels.insert(name.into(), data);
    }

    pub fn stim_channel(&self, name: &str) -> Result<&[i32]> {
        self.stim_channels
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| AnnotationError::ChannelNotFound(name.to_string()))
    }

    pub fn stim_channel_names(&self) -> impl Iterator<Item = &str> {
        self.stim_channels.keys().map(String::as_str)
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Append annotations. Existing annotations are left untouched.
    pub fn extend_annotations<I>(&mut self, annotations: I)
    where
        I: IntoIterator<Item = Annotation>,
    {
        self.annotations.extend(annotations);
    }

    pub fn find_events(&self, channel: &str, consecutive: Consecutive) -> Result<Vec<Event>> {
        Ok(find_events(self.stim_channel(channel)?, consecutive))
    }

    /// Reconstruct annotations from the [`DEFAULT_STIM_CHANNEL`] and append them.
    pub fn add_annotations_from_events(
        &mut self,
        software: &TriggerTable,
        hardware: &TriggerTable,
    ) -> Result<Reconstruction> {
        self.add_annotations_from_channel(DEFAULT_STIM_CHANNEL, software, hardware)
    }

    /// Reconstruct annotations from `channel` and append them.
    ///
    /// Nothing is appended when an error is returned.
    pub fn add_annotations_from_channel(
        &mut self,
        channel: &str,
        software: &TriggerTable,
        hardware: &TriggerTable,
    ) -> Result<Reconstruction> {
        let events = self.find_events(channel, Consecutive::Increasing)?;
        let result = reconstruct(&events, software, hardware, self.sample_rate)?;

        log::debug!(
            "Channel '{}': appending {} annotations",
            channel,
            result.annotations.len()
        );
        self.extend_annotations(result.annotations.iter().cloned());
        Ok(result)
    }

    /// Wall-clock onset of `annotation`, if the measurement date is known.
    pub fn absolute_onset(&self, annotation: &Annotation) -> Option<NaiveDateTime> {
        let offset = Duration::microseconds((annotation.onset * 1e6).round() as i64);
        self.meas_date?.checked_add_signed(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_new_rejects_bad_sample_rate() {
        assert!(matches!(
            Recording::new(0.0),
            Err(AnnotationError::InvalidSampleRate(_))
        ));
        assert!(Recording::new(-250.0).is_err());
    }

    #[test]
    fn test_missing_channel() {
        let recording = Recording::new(512.0).unwrap();
        let err = recording.stim_channel(DEFAULT_STIM_CHANNEL).unwrap_err();
        assert!(matches!(err, AnnotationError::ChannelNotFound(name) if name == "TRIGGER"));
    }

    #[test]
    fn test_absolute_onset() {
        let start = NaiveDate::from_ymd_opt(2022, 3, 14)
            .unwrap()
            .and_hms_opt(22, 30, 0)
            .unwrap();
        let recording = Recording::new(100.0).unwrap().with_meas_date(start);

        let annotation = Annotation::new(90.5, 0.1, "Sound");
        let onset = recording.absolute_onset(&annotation).unwrap();
        assert_eq!(
            onset,
            NaiveDate::from_ymd_opt(2022, 3, 14)
                .unwrap()
                .and_hms_milli_opt(22, 31, 30, 500)
                .unwrap()
        );

        let undated = Recording::new(100.0).unwrap();
        assert!(undated.absolute_onset(&annotation).is_none());
    }
}
