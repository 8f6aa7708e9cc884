//! # Cardio-audio-sleep annotations
//!
//! Rebuilds the experiment annotations of a cardio-audio-sleep recording from
//! its stim channel. Trigger codes written during the experiment are turned
//! into labeled spans:
//!
//! - blocks delimited by start/stop triggers: `Synchronous`, `Isochronous`,
//!   `Asynchronous`, `Baseline`, and pauses labeled `BAD_Pause`;
//! - fixed-duration instants: `Sound` and `Omission` (0.1 s), `Percussion`,
//!   `String` and `Wind` stimuli (0.4 s), and the `R_Percussion`, `R_String`
//!   and `R_Wind` responses from the response box (0.1 s).
//!
//! ## Quick Start
//!
//! ```rust
//! use cardio_annotations::{Recording, TriggerTable, Result};
//!
//! fn main() -> Result<()> {
//!     let software = TriggerTable::from_json_str(r#"{
//!         "sync_start": 10, "sync_stop": 11,
//!         "iso_start": 12, "iso_stop": 13,
//!         "async_start": 14, "async_stop": 15,
//!         "baseline_start": 16, "baseline_stop": 17,
//!         "pause": 18, "resume": 19,
//!         "sound": 20, "omission": 21,
//!         "percussion": 22, "string": 23, "wind": 24
//!     }"#)?;
//!     let hardware = TriggerTable::from_ini_str("percussion = 1\nstring = 2\nwind = 4")?;
//!
//!     // Two synchronous starts but a single stop
//!     let mut trigger = vec![0; 2000];
//!     trigger[100] = 10;
//!     trigger[200] = 10;
//!     trigger[500] = 11;
//!     trigger[700] = 20;
//!
//!     let mut recording = Recording::new(100.0)?;
//!     recording.add_stim_channel("TRIGGER", trigger);
//!
//!     let result = recording.add_annotations_from_events(&software, &hardware)?;
//!     assert_eq!(result.count("Synchronous"), 0);
//!     assert_eq!(result.count("Sound"), 1);
//!
//!     for skipped in &result.skipped {
//!         println!("{}: {}", skipped.label, skipped.reason);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration errors vs. skipped categories
//!
//! A non-positive sampling rate or a trigger table missing one of the
//! [`SOFTWARE_TRIGGER_NAMES`] / [`HARDWARE_TRIGGER_NAMES`] aborts the call and
//! nothing is appended to the recording. A block category whose start and stop
//! counts differ is not an error: it is left out and listed in
//! [`Reconstruction::skipped`], so "no events" and "mismatched events" can be
//! told apart.
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade: skipped
//! categories at `warn`, per-call summaries at `debug`. Install any logger in
//! the application to see them.

pub mod error;
pub mod types;
pub mod utils;
pub mod triggers;
pub mod events;
pub mod reconstruct;
pub mod recording;

// Re-export main types for convenience
pub use error::{AnnotationError, Result};
pub use types::{Annotation, BlockCategory, Event, InstantCategory, TriggerSource};
pub use triggers::{TriggerTable, HARDWARE_TRIGGER_NAMES, SOFTWARE_TRIGGER_NAMES};
pub use events::{codes_present, find_events, Consecutive};
pub use reconstruct::{
    reconstruct, Reconstruction, SkipReason, SkippedCategory, BLOCK_CATEGORIES,
    INSTANT_CATEGORIES,
};
pub use recording::{Recording, DEFAULT_STIM_CHANNEL};

/// Library version
///
/// ```rust
/// let version = cardio_annotations::version();
/// assert!(version.contains('.'));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
