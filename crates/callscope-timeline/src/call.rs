//! A validated call with its derived segments

use crate::error::{TimelineError, TimelineResult};
use crate::segments::{derive_segments, segment_in_bounds};
use callscope_core::{CallRecord, EventMarker, TimelineSegment, TranscriptLine};
use tracing::{debug, info};
use validator::Validate;

/// Call data ready for the viewport and overlay
///
/// Construction validates the record, so every segment and marker is known
/// to lie inside `[0, total]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallTimeline {
    record: CallRecord,
    segments: Vec<TimelineSegment>,
}

impl CallTimeline {
    /// Validate `record` and derive its segments
    ///
    /// # Errors
    ///
    /// Returns an error if a field fails validation, the total duration is
    /// not a positive finite number, a marker lies outside the call, or a
    /// derived segment breaks `0 <= start <= end <= total`.
    pub fn new(record: CallRecord) -> TimelineResult<Self> {
        let total = record.total_duration;
        if !(total.is_finite() && total > 0.0) {
            return Err(TimelineError::invalid_record(format!(
                "total duration must be positive and finite, got {total}"
            )));
        }
        record.validate()?;

        if let Some(line) = record
            .transcript
            .iter()
            .find(|line| !(line.timestamp.is_finite() && line.duration.is_finite()))
        {
            return Err(TimelineError::invalid_record(format!(
                "transcript line {} has a non-finite time",
                line.id
            )));
        }

        if let Some(marker) = record
            .markers
            .iter()
            .find(|marker| !(0.0..=total).contains(&marker.timestamp))
        {
            return Err(TimelineError::invalid_marker(
                marker.id,
                marker.timestamp,
                total,
            ));
        }

        let segments = derive_segments(&record.transcript, total);
        if let Some(segment) = segments.iter().find(|s| !segment_in_bounds(s, total)) {
            return Err(TimelineError::invalid_segment(
                segment.id,
                segment.start,
                segment.end,
                total,
            ));
        }

        debug!(
            call_id = %record.id,
            lines = record.transcript.len(),
            markers = record.markers.len(),
            segments = segments.len(),
            "call validated"
        );
        info!(call_id = %record.id, total, "call loaded");

        Ok(Self { record, segments })
    }

    /// Call identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// Title, falling back to the id
    #[must_use]
    pub fn title(&self) -> &str {
        self.record.title.as_deref().unwrap_or(&self.record.id)
    }

    /// Length of the call in seconds
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.record.total_duration
    }

    /// Transcript lines in record order
    #[must_use]
    pub fn lines(&self) -> &[TranscriptLine] {
        &self.record.transcript
    }

    /// Event markers in record order
    #[must_use]
    pub fn markers(&self) -> &[EventMarker] {
        &self.record.markers
    }

    /// Derived speaker and silence segments
    #[must_use]
    pub fn segments(&self) -> &[TimelineSegment] {
        &self.segments
    }

    /// Marker by id
    #[must_use]
    pub fn marker(&self, id: u32) -> Option<&EventMarker> {
        self.record.markers.iter().find(|marker| marker.id == id)
    }

    /// Segment by id
    #[must_use]
    pub fn segment(&self, id: u32) -> Option<&TimelineSegment> {
        self.segments.iter().find(|segment| segment.id == id)
    }

    /// The underlying record
    #[must_use]
    pub const fn record(&self) -> &CallRecord {
        &self.record
    }
}

impl TryFrom<CallRecord> for CallTimeline {
    type Error = TimelineError;

    fn try_from(record: CallRecord) -> TimelineResult<Self> {
        Self::new(record)
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::float_cmp)]
mod tests {
    use super::*;
    use callscope_core::{EventKind, Speaker};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn record() -> CallRecord {
        let mut record = CallRecord::new("demo", 60.0);
        record.transcript = vec![
            TranscriptLine::new(1, Speaker::Agent, "Hello", 0.0, 5.0),
            TranscriptLine::new(2, Speaker::Customer, "Hi there", 10.0, 5.0),
        ];
        record.markers = vec![EventMarker::new(1, EventKind::DeadAir, 5.0).with_duration(5.0)];
        record
    }

    #[test]
    fn test_valid_record() {
        let call = CallTimeline::new(record()).unwrap();

        assert_eq!(call.id(), "demo");
        assert_eq!(call.title(), "demo");
        assert_eq!(call.total(), 60.0);
        assert_eq!(call.segments().len(), 4);
        assert_eq!(call.marker(1).map(|m| m.timestamp), Some(5.0));
        assert_eq!(call.segment(2).map(|s| s.start), Some(5.0));
        assert!(call.segment(99).is_none());
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_rejects_bad_total(#[case] total: f64) {
        let mut record = record();
        record.total_duration = total;
        assert!(matches!(
            CallTimeline::new(record),
            Err(TimelineError::InvalidRecord { .. })
        ));
    }

    #[rstest]
    #[case(-1.0)]
    #[case(60.5)]
    fn test_rejects_marker_outside_call(#[case] timestamp: f64) {
        let mut record = record();
        record.markers[0].timestamp = timestamp;
        let result = CallTimeline::new(record);
        // Negative timestamps fail field validation before the range check.
        assert!(result.as_ref().is_err_and(TimelineError::is_data_error));
    }

    #[test]
    fn test_marker_at_end_is_accepted() {
        let mut record = record();
        record.markers[0].timestamp = 60.0;
        assert!(CallTimeline::new(record).is_ok());
    }

    #[test]
    fn test_rejects_empty_text() {
        let mut record = record();
        record.transcript[1].text = String::new();
        assert!(matches!(
            CallTimeline::new(record),
            Err(TimelineError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_negative_line_time() {
        let mut record = record();
        record.transcript[0].timestamp = -2.0;
        assert!(CallTimeline::try_from(record).is_err());
    }
}
