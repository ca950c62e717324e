//! Transcript filtering and the line under the playhead

use callscope_core::TranscriptLine;

/// Lines whose text contains `query`, ignoring case, in input order
///
/// A blank query keeps every line.
pub fn filter_lines<'a>(lines: &'a [TranscriptLine], query: &str) -> Vec<&'a TranscriptLine> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return lines.iter().collect();
    }
    lines
        .iter()
        .filter(|line| line.text.to_lowercase().contains(&needle))
        .collect()
}

/// First line being spoken at `time`
pub fn line_at(lines: &[TranscriptLine], time: f64) -> Option<&TranscriptLine> {
    lines.iter().find(|line| line.contains(time))
}
