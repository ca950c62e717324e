//! Terminal player for call transcript timelines
//!
//! This crate drives a [`callscope_timeline::Session`] from a tokio timer and
//! draws its frames as plain text. The `callscope` binary wraps it in a CLI.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

pub mod commands;
pub mod driver;
pub mod render;

pub use commands::{ViewOptions, provider_for};
pub use driver::{DriveSummary, PlaybackDriver, StopReason};
pub use render::TextRenderer;
