//! Error types for the form, the backend client and configuration loading.
//!
//! Validation errors ([`FormError`]) carry the exact text shown to the user in
//! an alert. Transport and response problems ([`ApiError`]) only ever reach the
//! developer log.

use thiserror::Error;

/// A user action the form refuses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in at least one topic.")]
    NoTopics,

    #[error(
        "Advanced mode is limited to 1 topic. Please remove extra topics or switch to Standard mode."
    )]
    TooManyTopicsForAdvanced { count: usize },

    #[error("Advanced mode is limited to 1 topic due to longer processing time.")]
    AddRefusedInAdvanced,

    #[error("The first topic cannot be removed.")]
    FirstFieldNotRemovable,

    #[error("There is no topic field #{id}.")]
    UnknownField { id: usize },

    #[error("Unknown layout `{layout}`.")]
    UnknownLayout { layout: String },

    #[error("Unknown language `{language}`.")]
    UnknownLanguage { language: String },
}

/// Failure talking to the generation backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid endpoint url: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Why a submission did not end in navigation.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Rejected(#[from] FormError),

    #[error("a generation request is already in flight")]
    AlreadyInFlight,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("newspaper path not found in response")]
    MissingPath,
}

/// Problem reading the optional YAML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid server url `{url}`: {source}")]
    Server {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("config lists no {what}")]
    Empty { what: &'static str },

    #[error("config lists {what} `{value}` more than once")]
    Duplicate { what: &'static str, value: String },

    #[error("default {what} `{value}` is not among the listed {what}s")]
    NotListed { what: &'static str, value: String },
}
