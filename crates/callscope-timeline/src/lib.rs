//! Timeline model for reviewing recorded sales calls
//!
//! This crate holds everything between a loaded call record and a drawn
//! timeline: the zoomable viewport, the overlay resolver that places event
//! markers and speaker/silence segments inside the visible window, the
//! playback clock, and a [`Session`] reducer that ties them together.
//! Nothing here draws; a frontend renders [`OverlayFrame`]s.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::multiple_crate_versions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cast_precision_loss,
    clippy::float_cmp,
    clippy::suboptimal_flops,
    clippy::return_self_not_must_use
)]

pub mod call;
pub mod error;
pub mod mapper;
pub mod overlay;
pub mod playback;
pub mod provider;
pub mod ruler;
pub mod sample;
pub mod search;
pub mod segments;
pub mod session;
pub mod viewport;

pub use call::CallTimeline;
pub use error::{TimelineError, TimelineResult};
pub use mapper::TimeWindow;
pub use overlay::{FrameRequest, Lane, OverlayFrame, OverlayPolicy, Placed, Span};
pub use playback::{Playback, TickOutcome};
pub use provider::{CallDataProvider, CallSummary, JsonCallProvider};
pub use ruler::Tick;
pub use session::{Key, Message, Outcome, Session};
pub use viewport::{Viewport, ZoomSettings};

// Re-export commonly used items
pub use sample::{SAMPLE_CALL_ID, SampleCallProvider};
