//! Error types for callscope

use std::{error::Error as StdError, fmt};

/// Main error type for callscope
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Validation error
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Not found error
    NotFound {
        /// Resource that was not found
        resource: String,
    },

    /// Serialization error
    Serialization(serde_json::Error),

    /// Other error
    Other(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a validation error for a named field
    #[must_use]
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Validation { field, message } => {
                write!(f, "Validation error: {field} - {message}")
            }
            Self::NotFound { resource } => write!(f, "Resource not found: {resource}"),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

// From implementations for automatic conversions
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map_or_else(|| "record".to_string(), ToString::to_string);
        Self::Validation {
            field,
            message: errors.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::missing_panics_doc,
    clippy::uninlined_format_args,
    clippy::match_same_arms
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::error::Error as StdError;
    use std::io;

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let app_error = Error::from(io_error);

        match app_error {
            Error::Io(_) => {}
            _ => panic!("Expected Io error variant"),
        }

        assert!(format!("{}", app_error).contains("I/O error"));
    }

    #[test]
    fn test_configuration_error() {
        let error = Error::configuration("max_zoom must be at least 1");

        assert_eq!(
            format!("{}", error),
            "Configuration error: max_zoom must be at least 1"
        );
    }

    #[test]
    fn test_validation_error() {
        let error = Error::validation("timeline.tick_count", "must be at least 2");

        assert_eq!(
            format!("{}", error),
            "Validation error: timeline.tick_count - must be at least 2"
        );
    }

    #[test]
    fn test_not_found_error() {
        let error = Error::NotFound {
            resource: "call acme-0419".to_string(),
        };
        assert_eq!(format!("{}", error), "Resource not found: call acme-0419");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>(r#"{"total": oops}"#).unwrap_err();
        let app_error = Error::from(json_error);

        assert!(matches!(app_error, Error::Serialization(_)));
        assert!(app_error.source().is_some());
        assert!(format!("{}", app_error).contains("Serialization error"));
    }

    #[test]
    fn test_error_source_for_message_variants() {
        assert!(Error::configuration("x").source().is_none());
        assert!(Error::validation("a", "b").source().is_none());
        assert!(Error::Other("x".to_string()).source().is_none());
    }

    #[test]
    fn test_other_error_is_verbatim() {
        let error = Error::Other("Unexpected error occurred".to_string());
        assert_eq!(format!("{}", error), "Unexpected error occurred");
    }
}
