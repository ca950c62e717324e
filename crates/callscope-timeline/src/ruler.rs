//! Time labels along the top of the timeline

use crate::mapper::{TimeWindow, time_of};
use callscope_core::utils::format_timestamp;
use serde::Serialize;

/// One ruler label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    /// Position as a fraction of the window
    pub fraction: f64,
    /// Time under the label in seconds
    pub time: f64,
    /// `MM:SS` label
    pub label: String,
}

/// `count` evenly spaced labels from the window start to its end
///
/// A count of one yields only the start label.
pub fn ticks(window: &TimeWindow, count: usize) -> Vec<Tick> {
    let intervals = count.saturating_sub(1).max(1) as f64;
    (0..count)
        .map(|i| {
            let fraction = i as f64 / intervals;
            let time = time_of(fraction, window);
            Tick {
                fraction,
                time,
                label: format_timestamp(time),
            }
        })
        .collect()
}
