//! # Messaging Error Types
//!
//! Structured error handling for the messaging layer using thiserror.
//! Malformed inbound messages and handler failures are deliberately absent
//! here: the consume path settles those internally (acknowledge-and-drop or
//! negative acknowledgment) and they never surface as errors.

use thiserror::Error;

/// Errors raised by publishers, subscribers, and the factory
#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Operation requires an active connection: {operation}")]
    NotConnected { operation: String },

    #[error("Message serialization error: {message}")]
    Serialization { message: String },

    #[error("Publish to {destination} failed: {message}")]
    Publish { destination: String, message: String },

    #[error("Subscribe to {destination} failed: {message}")]
    Subscribe { destination: String, message: String },

    #[error("Consume operation failed: {message}")]
    Consume { message: String },

    #[error("Configuration error: {field}: {message}")]
    Configuration { field: String, message: String },
}

impl MessagingError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a not-connected error for the named operation
    pub fn not_connected(operation: impl Into<String>) -> Self {
        Self::NotConnected {
            operation: operation.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a publish error
    pub fn publish(destination: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            destination: destination.into(),
            message: message.into(),
        }
    }

    /// Create a subscribe error
    pub fn subscribe(destination: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Subscribe {
            destination: destination.into(),
            message: message.into(),
        }
    }

    /// Create a consume error
    pub fn consume(message: impl Into<String>) -> Self {
        Self::Consume {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Conversion from serde_json::Error to MessagingError
impl From<serde_json::Error> for MessagingError {
    fn from(err: serde_json::Error) -> Self {
        MessagingError::serialization(err.to_string())
    }
}

/// Result type alias for messaging operations
pub type MessagingResult<T> = Result<T, MessagingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let conn_err = MessagingError::connection("broker unreachable");
        assert!(matches!(conn_err, MessagingError::Connection { .. }));

        let pub_err = MessagingError::publish("test-destination", "channel closed");
        assert!(matches!(pub_err, MessagingError::Publish { .. }));

        let cfg_err = MessagingError::configuration("backend", "unknown value");
        assert!(matches!(cfg_err, MessagingError::Configuration { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = MessagingError::not_connected("publish");
        let display = format!("{err}");
        assert!(display.contains("requires an active connection"));
        assert!(display.contains("publish"));

        let err = MessagingError::publish("test-generation-requested", "nacked");
        let display = format!("{err}");
        assert!(display.contains("test-generation-requested"));
        assert!(display.contains("nacked"));
    }

    #[test]
    fn test_serde_json_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let err: MessagingError = json_err.into();
        assert!(matches!(err, MessagingError::Serialization { .. }));
    }
}
