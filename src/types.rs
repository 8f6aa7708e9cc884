/// A transition of the stim channel to a non-zero code.
///
/// Mirrors the classic `(sample, previous, code)` event triplet produced by
/// stim-channel event finders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    pub sample: u64,   // 采样点索引
    pub previous: i32, // 跳变前的通道值
    pub code: i32,     // 触发码
}

impl Event {
    pub fn new(sample: u64, code: i32) -> Self {
        Self { sample, previous: 0, code }
    }
}

impl From<(u64, i32)> for Event {
    fn from((sample, code): (u64, i32)) -> Self {
        Event::new(sample, code)
    }
}

impl From<(u64, i32, i32)> for Event {
    fn from((sample, previous, code): (u64, i32, i32)) -> Self {
        Event { sample, previous, code }
    }
}

impl From<&Event> for Event {
    fn from(event: &Event) -> Self {
        *event
    }
}

/// Prefix marking a span that should be excluded from analysis.
pub const BAD_PREFIX: &str = "BAD_";

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub onset: f64,          // 开始时间（秒）
    pub duration: f64,       // 持续时间（秒，>= 0）
    pub description: String, // 标签
}

impl Annotation {
    pub fn new(onset: f64, duration: f64, description: impl Into<String>) -> Self {
        Self {
            onset,
            duration,
            description: description.into(),
        }
    }

    /// End of the annotated span in seconds.
    pub fn end(&self) -> f64 {
        self.onset + self.duration
    }

    /// Whether the span is flagged for quality exclusion (`BAD_*` label).
    pub fn is_bad(&self) -> bool {
        self.description.starts_with(BAD_PREFIX)
    }
}

/// Which trigger table a category reads its code from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    /// Triggers emitted by the stimulation software.
    Software,
    /// Triggers emitted by the response box, in its own code space.
    Hardware,
}

/// An experimental phase delimited by a start and a stop trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCategory {
    pub label: &'static str,
    pub start: &'static str,
    pub stop: &'static str,
}

/// A momentary event with a fixed duration and no stop trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstantCategory {
    pub label: &'static str,
    pub trigger: &'static str,
    pub source: TriggerSource,
    pub duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_end_and_bad_flag() {
        let pause = Annotation::new(2.0, 3.5, "BAD_Pause");
        assert_eq!(pause.end(), 5.5);
        assert!(pause.is_bad());

        let sound = Annotation::new(1.0, 0.1, "Sound");
        assert!(!sound.is_bad());
    }

    #[test]
    fn test_event_conversions() {
        let event: Event = (42u64, 7).into();
        assert_eq!(event, Event { sample: 42, previous: 0, code: 7 });

        let event: Event = (42u64, 3, 7).into();
        assert_eq!(event.previous, 3);
    }
}
