//! Core data types for callscope

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Identifier of a transcript line, segment or marker within one call
pub type ItemId = u32;

/// Call identifier type
pub type CallId = String;

/// Who is talking in a transcript line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The sales agent
    Agent,
    /// The customer on the other end
    Customer,
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Agent => write!(f, "Agent"),
            Self::Customer => write!(f, "Customer"),
        }
    }
}

/// Kind of a timeline segment; each kind occupies its own lane
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Agent speaking
    Agent,
    /// Customer speaking
    Customer,
    /// Nobody speaking
    Silence,
}

impl SegmentKind {
    /// Label shown when hovering a segment
    #[must_use]
    pub const fn hover_label(self) -> &'static str {
        match self {
            Self::Agent => "Agent Speaking",
            Self::Customer => "Customer Speaking",
            Self::Silence => "Silence",
        }
    }
}

impl From<Speaker> for SegmentKind {
    fn from(speaker: Speaker) -> Self {
        match speaker {
            Speaker::Agent => Self::Agent,
            Speaker::Customer => Self::Customer,
        }
    }
}

impl std::fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Agent => write!(f, "agent"),
            Self::Customer => write!(f, "customer"),
            Self::Silence => write!(f, "silence"),
        }
    }
}

/// Sentiment attached to a line or segment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    /// Positive tone
    Positive,
    /// Neutral tone
    Neutral,
    /// Negative tone
    Negative,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Neutral => write!(f, "neutral"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

/// Kind of an event marker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Prolonged silence
    DeadAir,
    /// Customer objection
    Objection,
    /// Customer mentioned budget limits
    BudgetConcern,
    /// One party talked over the other
    Interruption,
    /// Buying signal or other highlight
    KeyPoint,
}

impl EventKind {
    /// Default label when a marker carries none
    #[must_use]
    pub const fn default_label(self) -> &'static str {
        match self {
            Self::DeadAir => "Dead Air",
            Self::Objection => "Customer Objection",
            Self::BudgetConcern => "Budget Concern",
            Self::Interruption => "Interruption",
            Self::KeyPoint => "Key Point",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeadAir => write!(f, "dead_air"),
            Self::Objection => write!(f, "objection"),
            Self::BudgetConcern => write!(f, "budget_concern"),
            Self::Interruption => write!(f, "interruption"),
            Self::KeyPoint => write!(f, "key_point"),
        }
    }
}

/// Severity of an event marker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational
    Low,
    /// Worth a look
    #[default]
    Medium,
    /// Needs attention
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// One utterance of the transcript
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct TranscriptLine {
    /// Line identifier
    pub id: ItemId,

    /// Who said it
    pub speaker: Speaker,

    /// What was said
    #[validate(length(min = 1))]
    pub text: String,

    /// Start of the utterance in seconds from call start
    #[validate(range(min = 0.0))]
    pub timestamp: f64,

    /// Length of the utterance in seconds
    #[validate(range(min = 0.0))]
    pub duration: f64,

    /// Detected sentiment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,

    /// Detected emotion tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,

    /// Whether the line was flagged for review
    #[serde(default)]
    pub flagged: bool,

    /// Why the line was flagged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_reason: Option<String>,
}

impl TranscriptLine {
    /// Create an unflagged line without sentiment
    pub fn new(
        id: ItemId,
        speaker: Speaker,
        text: impl Into<String>,
        timestamp: f64,
        duration: f64,
    ) -> Self {
        Self {
            id,
            speaker,
            text: text.into(),
            timestamp,
            duration,
            sentiment: None,
            emotion: None,
            flagged: false,
            flag_reason: None,
        }
    }

    /// Set the sentiment
    #[must_use]
    pub const fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    /// Set the emotion tag
    #[must_use]
    pub fn with_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = Some(emotion.into());
        self
    }

    /// Flag the line with a reason
    #[must_use]
    pub fn flagged(mut self, reason: impl Into<String>) -> Self {
        self.flagged = true;
        self.flag_reason = Some(reason.into());
        self
    }

    /// End of the utterance in seconds
    #[must_use]
    pub fn end(&self) -> f64 {
        self.timestamp + self.duration
    }

    /// Whether `time` falls inside `[timestamp, end)`
    #[must_use]
    pub fn contains(&self, time: f64) -> bool {
        time >= self.timestamp && time < self.end()
    }
}

/// A time range on one lane of the timeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineSegment {
    /// Segment identifier
    pub id: ItemId,

    /// Lane of the segment
    pub kind: SegmentKind,

    /// Start in seconds
    pub start: f64,

    /// End in seconds
    pub end: f64,

    /// Sentiment of the underlying line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,

    /// Text of the underlying line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl TimelineSegment {
    /// Create a segment without sentiment or text
    #[must_use]
    pub const fn new(id: ItemId, kind: SegmentKind, start: f64, end: f64) -> Self {
        Self {
            id,
            kind,
            start,
            end,
            sentiment: None,
            text: None,
        }
    }

    /// Length in seconds
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Middle of the segment in seconds
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        self.start + self.duration() / 2.0
    }
}

/// A point-in-time annotation on the events lane
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct EventMarker {
    /// Marker identifier
    pub id: ItemId,

    /// What happened
    pub kind: EventKind,

    /// When it happened, in seconds
    #[validate(range(min = 0.0))]
    pub timestamp: f64,

    /// How long it lasted, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub duration: Option<f64>,

    /// Short label
    #[validate(length(min = 1))]
    pub label: String,

    /// Longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Severity, medium when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl EventMarker {
    /// Create a marker labelled after its kind
    #[must_use]
    pub fn new(id: ItemId, kind: EventKind, timestamp: f64) -> Self {
        Self {
            id,
            kind,
            timestamp,
            duration: None,
            label: kind.default_label().to_string(),
            description: None,
            severity: None,
        }
    }

    /// Set the duration
    #[must_use]
    pub const fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the severity
    #[must_use]
    pub const fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Severity with the medium default applied
    #[must_use]
    pub fn effective_severity(&self) -> Severity {
        self.severity.unwrap_or_default()
    }
}

/// Everything loaded for one call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct CallRecord {
    /// Call identifier
    #[validate(length(min = 1, max = 128))]
    pub id: CallId,

    /// Human readable title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255))]
    pub title: Option<String>,

    /// Length of the call in seconds
    #[validate(range(exclusive_min = 0.0))]
    pub total_duration: f64,

    /// Transcript lines
    #[serde(default)]
    #[validate(nested)]
    pub transcript: Vec<TranscriptLine>,

    /// Event markers
    #[serde(default)]
    #[validate(nested)]
    pub markers: Vec<EventMarker>,
}

impl CallRecord {
    /// Create an empty record of the given length
    pub fn new(id: impl Into<CallId>, total_duration: f64) -> Self {
        Self {
            id: id.into(),
            title: None,
            total_duration,
            transcript: Vec::new(),
            markers: Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_enum_serialization_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&EventKind::BudgetConcern).unwrap(),
            "\"budget_concern\""
        );
        assert_eq!(
            serde_json::to_string(&SegmentKind::Silence).unwrap(),
            "\"silence\""
        );
        let kind: EventKind = serde_json::from_str("\"dead_air\"").unwrap();
        assert_eq!(kind, EventKind::DeadAir);
    }

    #[test]
    fn test_transcript_line_contains_is_half_open() {
        let line = TranscriptLine::new(1, Speaker::Agent, "Hello", 10.0, 5.0);

        assert_eq!(line.end(), 15.0);
        assert!(line.contains(10.0));
        assert!(line.contains(14.99));
        assert!(!line.contains(15.0));
        assert!(!line.contains(9.99));
    }

    #[test]
    fn test_transcript_line_builders() {
        let line = TranscriptLine::new(6, Speaker::Customer, "Integration is a headache", 40.0, 9.0)
            .with_sentiment(Sentiment::Negative)
            .with_emotion("frustrated")
            .flagged("Pain point identified");

        assert_eq!(line.sentiment, Some(Sentiment::Negative));
        assert_eq!(line.emotion.as_deref(), Some("frustrated"));
        assert!(line.flagged);
        assert_eq!(line.flag_reason.as_deref(), Some("Pain point identified"));
    }

    #[test]
    fn test_marker_defaults() {
        let marker = EventMarker::new(1, EventKind::DeadAir, 36.0);

        assert_eq!(marker.label, "Dead Air");
        assert_eq!(marker.effective_severity(), Severity::Medium);
        assert_eq!(
            marker.with_severity(Severity::High).effective_severity(),
            Severity::High
        );
    }

    #[test]
    fn test_segment_geometry() {
        let segment = TimelineSegment::new(3, SegmentKind::Agent, 16.0, 23.0);

        assert_eq!(segment.duration(), 7.0);
        assert_eq!(segment.midpoint(), 19.5);
        assert_eq!(segment.kind.hover_label(), "Agent Speaking");
    }

    #[test]
    fn test_record_validation() {
        let mut record = CallRecord::new("demo", 120.0);
        record
            .transcript
            .push(TranscriptLine::new(1, Speaker::Agent, "Hi", 0.0, 2.0));
        assert!(record.validate().is_ok());

        record
            .transcript
            .push(TranscriptLine::new(2, Speaker::Customer, "", 3.0, 2.0));
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_record_rejects_non_positive_duration() {
        let record = CallRecord::new("empty", 0.0);
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_line_deserializes_with_optional_fields_missing() {
        let json = r#"{"id": 4, "speaker": "customer", "text": "Sure", "timestamp": 25, "duration": 3}"#;
        let line: TranscriptLine = serde_json::from_str(json).unwrap();

        assert_eq!(line.speaker, Speaker::Customer);
        assert_eq!(line.timestamp, 25.0);
        assert!(!line.flagged);
        assert!(line.sentiment.is_none());
    }
}
