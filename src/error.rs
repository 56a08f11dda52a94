//! Error types for the Feishu bot client

use std::time::Duration;

use thiserror::Error;

use crate::i18n::Language;

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or delivering a message
#[derive(Debug, Error)]
pub enum Error {
    /// A window reservation could never be satisfied
    #[error("admission error: {0}")]
    Admission(String),

    /// A bounded admission wait elapsed before both windows admitted the call
    #[error("admission timed out after {0:?}")]
    AdmissionTimeout(Duration),

    /// One language fragment failed to encode; the whole document is discarded
    #[error("serialization error ({language}): {source}")]
    Serialization {
        /// Language tag of the offending fragment
        language: Language,
        /// Underlying encoder error
        #[source]
        source: serde_json::Error,
    },

    /// JSON encode/decode error outside of i18n assembly
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Signature generation error
    #[error("signature error: {0}")]
    Signature(String),

    /// The after-build hook rejected the message body
    #[error("hook error: {0}")]
    Hook(String),

    /// HTTP transport error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The webhook answered with something other than the JSON envelope
    #[error("unexpected response ({status}): {body}")]
    UnexpectedResponse {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The platform accepted the request but reported a failure
    #[error("api error {code}: {msg}")]
    Api {
        /// Platform error code (non-zero)
        code: i64,
        /// Platform error message
        msg: String,
    },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
