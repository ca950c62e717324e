//! Resolve which markers and segments fall inside the visible window
//!
//! Each item kind has its own lane, so items never compete for space. The
//! resolver only computes placements; the underlying data is never touched.

use crate::mapper::{TimeWindow, position_checked, position_of};
use crate::ruler::{Tick, ticks};
use callscope_core::{EventMarker, SegmentKind, TimelineConfig, TimelineSegment};
use serde::Serialize;

/// Something with a position on the timeline
///
/// Items without an end are points.
pub trait Span {
    /// Start in seconds
    fn start(&self) -> f64;

    /// End in seconds, `None` for point items
    fn end(&self) -> Option<f64>;
}

impl Span for TimelineSegment {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> Option<f64> {
        Some(self.end)
    }
}

// Markers are drawn at their timestamp; the duration is informational.
impl Span for EventMarker {
    fn start(&self) -> f64 {
        self.timestamp
    }

    fn end(&self) -> Option<f64> {
        None
    }
}

/// An item placed inside the window
#[derive(Debug, PartialEq, Serialize)]
pub struct Placed<'a, T> {
    /// The underlying item
    pub item: &'a T,
    /// Left edge as a fraction of the window
    pub left: f64,
    /// Width as a fraction of the window, 0 for points
    pub width: f64,
}

impl<T> Clone for Placed<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Placed<'_, T> {}

/// Place a single item, `None` when it lies outside the window
pub fn place<'a, T: Span>(item: &'a T, window: &TimeWindow) -> Option<Placed<'a, T>> {
    let start = item.start();
    match item.end() {
        None => position_checked(start, window).map(|left| Placed {
            item,
            left,
            width: 0.0,
        }),
        Some(end) => {
            if !window.overlaps(start, end) {
                return None;
            }
            let clipped_start = start.max(window.start);
            let clipped_end = end.min(window.end());
            let width = if window.width > 0.0 {
                ((clipped_end - clipped_start) / window.width).max(0.0)
            } else {
                0.0
            };
            Some(Placed {
                item,
                left: position_of(clipped_start, window),
                width,
            })
        }
    }
}

/// Items overlapping the closed window, in input order
pub fn visible_of<'a, T: Span>(items: &'a [T], window: &TimeWindow) -> Vec<Placed<'a, T>> {
    items.iter().filter_map(|item| place(item, window)).collect()
}

/// Horizontal row of the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    /// Event markers
    Events,
    /// Agent speech
    Agent,
    /// Customer speech
    Customer,
    /// Silence
    Silence,
}

impl From<SegmentKind> for Lane {
    fn from(kind: SegmentKind) -> Self {
        match kind {
            SegmentKind::Agent => Self::Agent,
            SegmentKind::Customer => Self::Customer,
            SegmentKind::Silence => Self::Silence,
        }
    }
}

/// Which lanes hide slivers, and below what width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPolicy {
    /// Narrowest width fraction still drawn on suppressing lanes
    pub min_visible_fraction: f64,
    /// Hide silence slivers
    pub suppress_silence: bool,
    /// Hide agent and customer slivers
    pub suppress_speakers: bool,
}

impl Default for OverlayPolicy {
    fn default() -> Self {
        Self {
            min_visible_fraction: 0.005,
            suppress_silence: true,
            suppress_speakers: false,
        }
    }
}

impl From<&TimelineConfig> for OverlayPolicy {
    fn from(config: &TimelineConfig) -> Self {
        Self {
            min_visible_fraction: config.min_visible_fraction,
            suppress_silence: config.suppress_silence_slivers,
            suppress_speakers: config.suppress_speaker_slivers,
        }
    }
}

impl OverlayPolicy {
    /// Whether slivers are hidden on `lane`
    #[must_use]
    pub const fn suppresses(&self, lane: Lane) -> bool {
        match lane {
            Lane::Events => false,
            Lane::Agent | Lane::Customer => self.suppress_speakers,
            Lane::Silence => self.suppress_silence,
        }
    }

    fn keeps<T>(&self, lane: Lane, placed: &Placed<'_, T>) -> bool {
        !self.suppresses(lane) || placed.width >= self.min_visible_fraction
    }
}

/// Everything needed to draw one frame of the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayFrame<'a> {
    /// The window the frame was resolved for
    pub window: TimeWindow,
    /// Markers on the events lane
    pub events: Vec<Placed<'a, EventMarker>>,
    /// Agent lane
    pub agent: Vec<Placed<'a, TimelineSegment>>,
    /// Customer lane
    pub customer: Vec<Placed<'a, TimelineSegment>>,
    /// Silence lane
    pub silence: Vec<Placed<'a, TimelineSegment>>,
    /// Playhead fraction when the playhead is inside the window
    pub playhead: Option<f64>,
    /// Ruler labels
    pub ticks: Vec<Tick>,
}

impl OverlayFrame<'_> {
    /// Segments placed on a speaker or silence lane
    #[must_use]
    pub fn lane(&self, lane: Lane) -> &[Placed<'_, TimelineSegment>] {
        match lane {
            Lane::Agent => &self.agent,
            Lane::Customer => &self.customer,
            Lane::Silence => &self.silence,
            Lane::Events => &[],
        }
    }

    /// Number of items drawn across all lanes
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.events.len() + self.agent.len() + self.customer.len() + self.silence.len()
    }
}

/// Inputs to [`resolve_frame`] that are not the call data itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRequest {
    /// Visible window
    pub window: TimeWindow,
    /// Playback position in seconds
    pub playhead: f64,
    /// Sliver policy
    pub policy: OverlayPolicy,
    /// Number of ruler labels
    pub tick_count: usize,
}

/// Resolve every lane, the playhead and the ruler for one window
pub fn resolve_frame<'a>(
    segments: &'a [TimelineSegment],
    markers: &'a [EventMarker],
    request: &FrameRequest,
) -> OverlayFrame<'a> {
    let window = request.window;
    let policy = request.policy;
    let mut agent = Vec::new();
    let mut customer = Vec::new();
    let mut silence = Vec::new();

    for placed in visible_of(segments, &window) {
        let lane = Lane::from(placed.item.kind);
        if !policy.keeps(lane, &placed) {
            continue;
        }
        match placed.item.kind {
            SegmentKind::Agent => agent.push(placed),
            SegmentKind::Customer => customer.push(placed),
            SegmentKind::Silence => silence.push(placed),
        }
    }

    OverlayFrame {
        window,
        events: visible_of(markers, &window),
        agent,
        customer,
        silence,
        playhead: position_checked(request.playhead, &window),
        ticks: ticks(&window, request.tick_count),
    }
}

/// Fraction of the window at a segment's midpoint, where hover labels anchor
#[must_use]
pub fn midpoint_position(segment: &TimelineSegment, window: &TimeWindow) -> f64 {
    position_of(segment.midpoint(), window)
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::float_cmp)]
mod tests {
    use super::*;
    use callscope_core::EventKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn segment(id: u32, kind: SegmentKind, start: f64, end: f64) -> TimelineSegment {
        TimelineSegment::new(id, kind, start, end)
    }

    #[test]
    fn test_zero_width_segment_at_end_is_visible() {
        let segments = vec![
            segment(1, SegmentKind::Agent, 0.0, 5.0),
            segment(2, SegmentKind::Agent, 420.0, 420.0),
        ];
        let visible = visible_of(&segments, &TimeWindow::new(0.0, 420.0));

        assert_eq!(visible.len(), 2);
        assert_eq!(visible[1].left, 1.0);
        assert_eq!(visible[1].width, 0.0);
    }

    #[test]
    fn test_marker_outside_window_is_excluded() {
        let markers = vec![EventMarker::new(1, EventKind::Objection, 200.0)];
        let visible = visible_of(&markers, &TimeWindow::new(100.0, 50.0));
        assert!(visible.is_empty());
    }

    #[rstest]
    #[case(100.0, true)]
    #[case(150.0, true)]
    #[case(125.0, true)]
    #[case(99.0, false)]
    #[case(151.0, false)]
    fn test_marker_visibility_is_closed(#[case] timestamp: f64, #[case] visible: bool) {
        let markers = vec![EventMarker::new(1, EventKind::KeyPoint, timestamp).with_duration(30.0)];
        let placed = visible_of(&markers, &TimeWindow::new(100.0, 50.0));
        assert_eq!(placed.len(), usize::from(visible));
    }

    #[test]
    fn test_partial_overlap_is_clipped() {
        let segments = vec![
            segment(1, SegmentKind::Customer, 90.0, 110.0),
            segment(2, SegmentKind::Customer, 140.0, 160.0),
        ];
        let visible = visible_of(&segments, &TimeWindow::new(100.0, 50.0));

        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].left, 0.0);
        assert_eq!(visible[0].width, 0.2);
        assert_eq!(visible[1].left, 0.8);
        assert_eq!(visible[1].width, 0.2);
        // Clipping is a view concern only.
        assert_eq!(segments[0].start, 90.0);
    }

    #[test]
    fn test_input_order_is_kept() {
        let segments = vec![
            segment(7, SegmentKind::Agent, 30.0, 40.0),
            segment(3, SegmentKind::Agent, 10.0, 20.0),
        ];
        let ids: Vec<_> = visible_of(&segments, &TimeWindow::new(0.0, 100.0))
            .iter()
            .map(|placed| placed.item.id)
            .collect();
        assert_eq!(ids, vec![7, 3]);
    }

    #[test]
    fn test_silence_slivers_are_hidden_by_default() {
        let segments = vec![
            segment(1, SegmentKind::Agent, 0.0, 1.0),
            segment(2, SegmentKind::Silence, 1.0, 2.0),
            segment(3, SegmentKind::Silence, 2.0, 12.0),
        ];
        let request = FrameRequest {
            window: TimeWindow::new(0.0, 420.0),
            playhead: 0.0,
            policy: OverlayPolicy::default(),
            tick_count: 6,
        };
        let frame = resolve_frame(&segments, &[], &request);

        // 1s of 420s is below 0.5% but speaker lanes keep slivers.
        assert_eq!(frame.agent.len(), 1);
        assert_eq!(frame.silence.len(), 1);
        assert_eq!(frame.silence[0].item.id, 3);
    }

    #[test]
    fn test_speaker_suppression_is_configurable() {
        let segments = vec![segment(1, SegmentKind::Customer, 0.0, 1.0)];
        let request = FrameRequest {
            window: TimeWindow::new(0.0, 420.0),
            playhead: 0.0,
            policy: OverlayPolicy {
                suppress_speakers: true,
                ..OverlayPolicy::default()
            },
            tick_count: 6,
        };
        let frame = resolve_frame(&segments, &[], &request);
        assert!(frame.customer.is_empty());
    }

    #[test]
    fn test_frame_playhead_only_inside_window() {
        let request = FrameRequest {
            window: TimeWindow::new(100.0, 50.0),
            playhead: 125.0,
            policy: OverlayPolicy::default(),
            tick_count: 6,
        };
        let frame = resolve_frame(&[], &[], &request);
        assert_eq!(frame.playhead, Some(0.5));
        assert_eq!(frame.ticks.len(), 6);

        let outside = FrameRequest {
            playhead: 10.0,
            ..request
        };
        assert_eq!(resolve_frame(&[], &[], &outside).playhead, None);
    }

    #[test]
    fn test_lanes_are_split_by_kind() {
        let segments = vec![
            segment(1, SegmentKind::Agent, 0.0, 10.0),
            segment(2, SegmentKind::Silence, 10.0, 20.0),
            segment(3, SegmentKind::Customer, 20.0, 30.0),
        ];
        let markers = vec![EventMarker::new(1, EventKind::DeadAir, 12.0)];
        let request = FrameRequest {
            window: TimeWindow::new(0.0, 40.0),
            playhead: 0.0,
            policy: OverlayPolicy::default(),
            tick_count: 2,
        };
        let frame = resolve_frame(&segments, &markers, &request);

        assert_eq!(frame.lane(Lane::Agent).len(), 1);
        assert_eq!(frame.lane(Lane::Customer)[0].item.id, 3);
        assert_eq!(frame.lane(Lane::Silence)[0].item.id, 2);
        assert_eq!(frame.events[0].left, 0.3);
        assert_eq!(frame.item_count(), 4);
    }

    #[test]
    fn test_midpoint_position() {
        let segment = segment(1, SegmentKind::Agent, 100.0, 120.0);
        assert_eq!(midpoint_position(&segment, &TimeWindow::new(100.0, 40.0)), 0.25);
    }
}
