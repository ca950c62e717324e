//! Plain-text rendering of timeline frames

use callscope_core::{
    EventKind, TimelineSegment, TranscriptLine,
    utils::{format_duration, format_timestamp},
};
use callscope_timeline::{
    Lane, OverlayFrame, Placed, Session, TimeWindow, overlay::midpoint_position,
};
use std::fmt::Write as _;

const LABEL_WIDTH: usize = 10;
const MIN_COLUMNS: usize = 20;

/// Draws frames as fixed-width text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRenderer {
    columns: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(80)
    }
}

impl TextRenderer {
    /// Renderer whose lanes are `columns` characters wide
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(MIN_COLUMNS),
        }
    }

    /// Lane width in characters
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Status line, ruler, lanes and the line under the playhead
    pub fn render(&self, session: &Session) -> String {
        self.render_with_hover(session, None)
    }

    /// [`render`](Self::render) with a hover label under `hovered`
    pub fn render_with_hover(
        &self,
        session: &Session,
        hovered: Option<&TimelineSegment>,
    ) -> String {
        let mut out = status_line(session);
        out.push('\n');
        let frame = session.frame();
        out.push_str(&self.render_frame(&frame));
        if let Some(row) = hovered.and_then(|segment| self.hover_row(segment, &frame.window)) {
            out.push_str(&row);
            out.push('\n');
        }
        if let Some(line) = session.current_line() {
            let _ = writeln!(out, "{:>LABEL_WIDTH$} {}: {}", "now", line.speaker, line.text);
        }
        out
    }

    /// Ruler and all four lanes
    pub fn render_frame(&self, frame: &OverlayFrame<'_>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:LABEL_WIDTH$}{}", "", self.ruler(frame));

        let mut events = vec![' '; self.columns];
        for placed in &frame.events {
            events[self.column(placed.left)] = event_glyph(placed.item.kind);
        }
        let rows = [
            ("Events", events),
            ("Agent", self.lane_row(frame.lane(Lane::Agent), 'A')),
            ("Customer", self.lane_row(frame.lane(Lane::Customer), 'C')),
            ("Silence", self.lane_row(frame.lane(Lane::Silence), '.')),
        ];

        let playhead = frame.playhead.map(|fraction| self.column(fraction));
        for (label, mut row) in rows {
            if let Some(column) = playhead {
                row[column] = '|';
            }
            let _ = writeln!(
                out,
                "{label:<LABEL_WIDTH$}{}",
                row.into_iter().collect::<String>()
            );
        }
        out
    }

    /// Caret under a segment's midpoint followed by its hover label
    ///
    /// `None` when the segment lies outside `window`.
    pub fn hover_row(&self, segment: &TimelineSegment, window: &TimeWindow) -> Option<String> {
        if !window.overlaps(segment.start, segment.end) {
            return None;
        }
        let column = self.column(midpoint_position(segment, window));
        Some(format!(
            "{}^ {} {}-{} ({})",
            " ".repeat(LABEL_WIDTH + column),
            segment.kind.hover_label(),
            format_timestamp(segment.start),
            format_timestamp(segment.end),
            format_duration(segment.duration())
        ))
    }

    fn column(&self, fraction: f64) -> usize {
        let last = self.columns - 1;
        let column = (fraction.clamp(0.0, 1.0) * last as f64).round();
        (column as usize).min(last)
    }

    fn lane_row<T>(&self, placed: &[Placed<'_, T>], glyph: char) -> Vec<char> {
        let mut row = vec![' '; self.columns];
        for item in placed {
            let from = self.column(item.left);
            let to = self.column(item.left + item.width).max(from);
            row[from..=to].fill(glyph);
        }
        row
    }

    fn ruler(&self, frame: &OverlayFrame<'_>) -> String {
        let mut row = vec![' '; self.columns];
        for tick in &frame.ticks {
            let label: Vec<char> = tick.label.chars().collect();
            let start = self
                .column(tick.fraction)
                .min(self.columns.saturating_sub(label.len()));
            for (offset, c) in label.into_iter().enumerate() {
                if let Some(slot) = row.get_mut(start + offset) {
                    *slot = c;
                }
            }
        }
        row.into_iter().collect()
    }
}

/// One-line transport summary
pub fn status_line(session: &Session) -> String {
    let playback = session.playback();
    let viewport = session.viewport();
    let state = if playback.is_playing() { "playing" } else { "paused" };
    format!(
        "{} [{state}] {} / {}  zoom {:.1}x  speed {}x  vol {}{}",
        session.call().title(),
        format_timestamp(playback.current_time()),
        format_timestamp(playback.total()),
        viewport.zoom(),
        playback.speed(),
        playback.volume(),
        if session.is_fullscreen() { "  [fullscreen]" } else { "" },
    )
}

/// Transcript listing with the current line marked
pub fn render_transcript(lines: &[&TranscriptLine], current: Option<u32>) -> String {
    let mut out = String::new();
    for line in lines {
        let cursor = if Some(line.id) == current { '>' } else { ' ' };
        let _ = write!(
            out,
            "{cursor} [{}] {}: {}",
            format_timestamp(line.timestamp),
            line.speaker,
            line.text
        );
        if let Some(reason) = &line.flag_reason {
            let _ = write!(out, "  (! {reason})");
        }
        out.push('\n');
    }
    out
}

const fn event_glyph(kind: EventKind) -> char {
    match kind {
        EventKind::DeadAir => 'D',
        EventKind::Objection => 'O',
        EventKind::BudgetConcern => '$',
        EventKind::Interruption => 'I',
        EventKind::KeyPoint => '*',
    }
}
