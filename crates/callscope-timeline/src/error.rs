//! Error types for loading and validating call timelines

use callscope_core::ItemId;
use std::io;
use thiserror::Error;

/// Result type alias for timeline operations
pub type TimelineResult<T> = Result<T, TimelineError>;

/// Errors that can occur while loading a call timeline
#[derive(Error, Debug)]
pub enum TimelineError {
    /// No call with this id in the data source
    #[error("Call not found: {call_id}")]
    CallNotFound {
        /// Requested call id
        call_id: String,
    },

    /// Record failed a structural check
    #[error("Invalid call record: {message}")]
    InvalidRecord {
        /// Error message
        message: String,
    },

    /// Derived segment breaks `0 <= start <= end <= total`
    #[error("Invalid segment {id}: [{start}, {end}] outside [0, {total}]")]
    InvalidSegment {
        /// Segment id
        id: ItemId,
        /// Segment start
        start: f64,
        /// Segment end
        end: f64,
        /// Call length
        total: f64,
    },

    /// Marker lies outside the call
    #[error("Marker {id} at {timestamp}s is outside [0, {total}]")]
    InvalidMarker {
        /// Marker id
        id: ItemId,
        /// Marker timestamp
        timestamp: f64,
        /// Call length
        total: f64,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Field validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Error from the core crate
    #[error(transparent)]
    Core(#[from] callscope_core::Error),
}

impl TimelineError {
    /// Create a call not found error
    pub fn call_not_found(call_id: impl Into<String>) -> Self {
        Self::CallNotFound {
            call_id: call_id.into(),
        }
    }

    /// Create an invalid record error
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    /// Create an invalid segment error
    pub const fn invalid_segment(id: ItemId, start: f64, end: f64, total: f64) -> Self {
        Self::InvalidSegment {
            id,
            start,
            end,
            total,
        }
    }

    /// Create an invalid marker error
    pub const fn invalid_marker(id: ItemId, timestamp: f64, total: f64) -> Self {
        Self::InvalidMarker {
            id,
            timestamp,
            total,
        }
    }

    /// Whether the error means the data itself is bad, as opposed to unreachable
    pub const fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRecord { .. }
                | Self::InvalidSegment { .. }
                | Self::InvalidMarker { .. }
                | Self::Json(_)
                | Self::Validation(_)
        )
    }
}

impl From<TimelineError> for callscope_core::Error {
    fn from(err: TimelineError) -> Self {
        match err {
            TimelineError::CallNotFound { call_id } => Self::NotFound {
                resource: format!("call {call_id}"),
            },
            TimelineError::Core(inner) => inner,
            TimelineError::Io(inner) => Self::Io(inner),
            other => Self::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = TimelineError::call_not_found("acme-0419");
        assert!(matches!(err, TimelineError::CallNotFound { .. }));

        let err = TimelineError::invalid_segment(3, 10.0, 5.0, 420.0);
        assert!(matches!(err, TimelineError::InvalidSegment { id: 3, .. }));
    }

    #[test]
    fn test_error_display() {
        let err = TimelineError::invalid_marker(2, 500.0, 420.0);
        let display = format!("{err}");
        assert!(display.contains("500s"));
        assert!(display.contains("420"));

        let err = TimelineError::call_not_found("missing");
        assert_eq!(err.to_string(), "Call not found: missing");
    }

    #[test]
    fn test_data_error_classification() {
        assert!(TimelineError::invalid_record("bad").is_data_error());
        assert!(!TimelineError::call_not_found("x").is_data_error());
        assert!(!TimelineError::Io(io::Error::other("disk")).is_data_error());
    }

    #[test]
    fn test_into_core_error() {
        let core: callscope_core::Error = TimelineError::call_not_found("x").into();
        assert!(matches!(core, callscope_core::Error::NotFound { .. }));

        let core: callscope_core::Error = TimelineError::invalid_record("bad").into();
        assert!(matches!(core, callscope_core::Error::Other(_)));
    }
}
