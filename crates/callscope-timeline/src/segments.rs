//! Build timeline segments from transcript lines
//!
//! Every line keeps its own `[timestamp, end)` span, so an interruption
//! overlaps the turn it cuts into. Stretches of `[0, total]` covered by no
//! line become silence segments.

use callscope_core::{ItemId, SegmentKind, TimelineSegment, TranscriptLine};

/// Derive speaker and silence segments for a call lasting `total` seconds
///
/// Lines are taken in timestamp order. Ids are assigned from 1.
pub fn derive_segments(lines: &[TranscriptLine], total: f64) -> Vec<TimelineSegment> {
    let total = total.max(0.0);
    let mut ordered: Vec<&TranscriptLine> = lines.iter().collect();
    ordered.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

    let mut tiler = Tiler::with_capacity(ordered.len() * 2 + 1);
    for line in ordered {
        tiler.silence_until(line.timestamp.min(total));
        tiler.speech(line, total);
    }
    tiler.silence_until(total);
    tiler.segments
}

struct Tiler {
    segments: Vec<TimelineSegment>,
    next_id: ItemId,
    // End of speech or silence coverage so far
    cursor: f64,
}

impl Tiler {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            segments: Vec::with_capacity(capacity),
            next_id: 1,
            cursor: 0.0,
        }
    }

    fn push(&mut self, segment: TimelineSegment) {
        self.cursor = self.cursor.max(segment.end);
        self.segments.push(TimelineSegment {
            id: self.next_id,
            ..segment
        });
        self.next_id += 1;
    }

    fn silence_until(&mut self, end: f64) {
        if end <= self.cursor {
            return;
        }
        // A skipped line must not split one silence in two.
        let extends_silence = matches!(
            self.segments.last(),
            Some(last) if last.kind == SegmentKind::Silence && last.end == self.cursor
        );
        if extends_silence {
            if let Some(last) = self.segments.last_mut() {
                last.end = end;
            }
            self.cursor = end;
        } else {
            self.push(TimelineSegment::new(
                0,
                SegmentKind::Silence,
                self.cursor,
                end,
            ));
        }
    }

    fn speech(&mut self, line: &TranscriptLine, total: f64) {
        let start = line.timestamp;
        let end = line.end().min(total);
        if end <= start {
            return;
        }
        self.push(TimelineSegment {
            sentiment: line.sentiment,
            text: Some(line.text.clone()),
            ..TimelineSegment::new(0, line.speaker.into(), start, end)
        });
    }
}

/// Whether `0 <= start <= end <= total` holds
#[must_use]
pub fn segment_in_bounds(segment: &TimelineSegment, total: f64) -> bool {
    segment.start >= 0.0 && segment.start <= segment.end && segment.end <= total
}
