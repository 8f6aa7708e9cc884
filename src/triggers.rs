//! Trigger code tables.
//!
//! A [`TriggerTable`] maps symbolic event names (`sync_start`, `sound`, ...) to
//! the integer codes written on the stim channel. Two tables are used per
//! recording: one for the stimulation software and one for the response box,
//! which records on its own device and therefore has its own code space.
//!
//! Tables are plain values handed to the reconstructor; nothing here is global.
//!
//! # Example
//!
//! ```rust
//! use cardio_annotations::{TriggerTable, HARDWARE_TRIGGER_NAMES};
//!
//! let table = TriggerTable::from_ini_str(
//!     "[events]\n\
//!      percussion = 1  # left button\n\
//!      string = 2\n\
//!      wind = 4\n",
//! ).unwrap();
//!
//! assert_eq!(table.code("string").unwrap(), 2);
//! assert_eq!(table.name_of(4), Some("wind"));
//! assert!(table.require(HARDWARE_TRIGGER_NAMES).is_ok());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::{AnnotationError, Result};
use crate::utils::{parse_trigger_code, strip_inline_comment};

/// Names the software trigger table must define.
pub const SOFTWARE_TRIGGER_NAMES: &[&str] = &[
    "sync_start",
    "sync_stop",
    "iso_start",
    "iso_stop",
    "async_start",
    "async_stop",
    "baseline_start",
    "baseline_stop",
    "pause",
    "resume",
    "sound",
    "omission",
    "percussion",
    "string",
    "wind",
];

/// Names the hardware (response box) trigger table must define.
pub const HARDWARE_TRIGGER_NAMES: &[&str] = &["percussion", "string", "wind"];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(into = "BTreeMap<String, i32>")]
pub struct TriggerTable {
    by_name: BTreeMap<String, i32>,
    by_value: BTreeMap<i32, String>,
}

impl TriggerTable {
    /// Build a table from `(name, code)` pairs.
    ///
    /// Fails if a code is zero (no event on the stim channel), if a code is
    /// used twice, or if a name appears twice.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        let mut table = TriggerTable::default();
        for (name, code) in entries {
            table.insert(name.into(), code)?;
        }
        Ok(table)
    }

    fn insert(&mut self, name: String, code: i32) -> Result<()> {
        if code == 0 {
            return Err(AnnotationError::InvalidTriggerCode {
                name,
                value: code.to_string(),
            });
        }
        if self.by_name.contains_key(&name) {
            return Err(AnnotationError::DuplicateTriggerName(name));
        }
        if let Some(first) = self.by_value.get(&code) {
            return Err(AnnotationError::DuplicateTriggerCode {
                code,
                first: first.clone(),
                second: name,
            });
        }
        self.by_value.insert(code, name.clone());
        self.by_name.insert(name, code);
        Ok(())
    }

    /// Parse the `name = code` text format.
    ///
    /// `[section]` headers are accepted and ignored, `:` works as a delimiter
    /// too, and anything after `#` or `;` is a comment.
    pub fn from_ini_str(content: &str) -> Result<Self> {
        let mut table = TriggerTable::default();

        for (idx, raw_line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = strip_inline_comment(raw_line).trim();
            if line.is_empty() || (line.starts_with('[') && line.ends_with(']')) {
                continue;
            }

            let (name, value) = line
                .split_once(|c: char| c == '=' || c == ':')
                .ok_or_else(|| AnnotationError::InvalidFormat {
                    line: line_no,
                    message: format!("expected 'name = code', got '{}'", line),
                })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(AnnotationError::InvalidFormat {
                    line: line_no,
                    message: "empty trigger name".to_string(),
                });
            }

            let code = parse_trigger_code(name, value)?;
            table.insert(name.to_string(), code)?;
        }

        Ok(table)
    }

    /// Parse a flat JSON object `{"name": code, ...}`.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a table from disk; `.json` files are parsed as JSON, anything else
    /// with the INI format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

        let table = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_ini_str(&content)?
        };
        log::debug!("Loaded {} triggers from {}", table.len(), path.display());
        Ok(table)
    }

    /// Code assigned to `name`.
    pub fn code(&self, name: &str) -> Result<i32> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| AnnotationError::MissingTrigger(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.by_name.get(name).copied()
    }

    /// Reverse lookup of a code.
    pub fn name_of(&self, code: i32) -> Option<&str> {
        self.by_value.get(&code).map(String::as_str)
    }

    /// `(code, name)` pairs in ascending code order.
    pub fn by_value(&self) -> impl Iterator<Item = (i32, &str)> {
        self.by_value.iter().map(|(code, name)| (*code, name.as_str()))
    }

    /// Check that every name in `names` is defined.
    pub fn require(&self, names: &[&str]) -> Result<()> {
        for name in names {
            self.code(name)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

// Each entry goes through `insert`; a repeated name is an error.
struct TriggerTableVisitor;

impl<'de> Visitor<'de> for TriggerTableVisitor {
    type Value = TriggerTable;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of trigger names to non-zero integer codes")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<TriggerTable, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut table = TriggerTable::default();
        while let Some((name, code)) = map.next_entry::<String, i32>()? {
            table.insert(name, code).map_err(de::Error::custom)?;
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for TriggerTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TriggerTableVisitor)
    }
}

impl From<TriggerTable> for BTreeMap<String, i32> {
    fn from(table: TriggerTable) -> Self {
        table.by_name
    }
}
