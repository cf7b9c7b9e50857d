//! Error types for ledger operations.
//!
//! This module defines the errors that can occur while reading the
//! transaction list or writing a placing number, whether the ledger is the
//! REST backend or the in-memory store.

use libcard_protocol::{PlacingNumber, RecordId};

/// Errors that can occur during ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a response.
    #[error("request to {endpoint} failed: {source}")]
    Http {
        /// Method and path of the request.
        endpoint: String,
        /// The transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The ledger answered with a non-success status.
    ///
    /// `message` is the backend's own explanation when it sent one.
    #[error("{message} (HTTP {status})")]
    Api {
        /// Method and path of the request.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Human-readable message from the backend.
        message: String,
    },

    /// The response body did not match the record schema.
    #[error("unexpected response from {endpoint}: {source}")]
    Deserialization {
        /// Method and path of the request.
        endpoint: String,
        /// The decoding error.
        #[source]
        source: reqwest::Error,
    },

    /// No record has this id.
    #[error("record {0} not found")]
    RecordNotFound(RecordId),

    /// Another record already occupies the requested slot.
    #[error("placing number {placing_number} is already taken by record {occupant}")]
    Conflict {
        /// The requested slot.
        placing_number: PlacingNumber,
        /// The record currently in it.
        occupant: RecordId,
    },

    /// The store could not be set up from the given settings.
    #[error("invalid ledger settings: {reason}")]
    InvalidSettings {
        /// What is wrong.
        reason: String,
    },
}

/// A specialized Result type for ledger operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Extracts a human-readable message from an error response body.
///
/// Prefers a `message` field, then a `detail` field, then the raw body.
///
/// # Examples
///
/// ```
/// use libcard_ledger::error::api_message;
///
/// assert_eq!(api_message(r#"{"detail":"Not found."}"#), "Not found.");
/// assert_eq!(api_message("Bad Gateway"), "Bad Gateway");
/// ```
#[must_use]
pub fn api_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "detail"]
                .into_iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
        });

    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => "no details provided".to_string(),
        None => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_api() {
        let err = Error::Api {
            endpoint: "PATCH /records/7/".to_string(),
            status: 409,
            message: "Slot already taken".to_string(),
        };
        assert_eq!(err.to_string(), "Slot already taken (HTTP 409)");
    }

    #[test]
    fn error_display_conflict() {
        let err = Error::Conflict {
            placing_number: 15,
            occupant: 9,
        };
        assert_eq!(
            err.to_string(),
            "placing number 15 is already taken by record 9"
        );
    }

    #[test]
    fn error_display_not_found() {
        assert_eq!(Error::RecordNotFound(7).to_string(), "record 7 not found");
    }

    #[test]
    fn api_message_prefers_message_over_detail() {
        assert_eq!(
            api_message(r#"{"message":"first","detail":"second"}"#),
            "first"
        );
    }

    #[test]
    fn api_message_ignores_non_string_fields() {
        assert_eq!(api_message(r#"{"detail":42}"#), r#"{"detail":42}"#);
    }

    #[test]
    fn api_message_handles_empty_body() {
        assert_eq!(api_message("   "), "no details provided");
    }
}
