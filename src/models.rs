//! Data models exchanged with the newspaper generation backend.
//!
//! This module defines the wire types and the small enumerations the form
//! works with:
//! - [`LengthMode`]: standard (multi-topic) or advanced (single topic)
//! - [`GenerateRequest`]: the JSON body posted to `/api/generate_newspaper`
//! - [`GenerateResponse`]: the JSON body the backend answers with
//!
//! Field names match the backend's JSON exactly, so no renaming is needed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Layout identifier selected when the page loads.
pub const DEFAULT_LAYOUT: &str = "layout_1.html";

/// Language selected when the page loads. The backend assumes the same default.
pub const DEFAULT_LANGUAGE: &str = "english";

/// Article length mode.
///
/// `Advanced` asks the backend for a deeper article and is limited to a
/// single topic because of the longer processing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LengthMode {
    /// Several topics, regular article length.
    #[default]
    Standard,
    /// One topic, longer processing per article.
    Advanced,
}

impl LengthMode {
    /// The value sent on the wire and shown in the length select.
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthMode::Standard => "standard",
            LengthMode::Advanced => "advanced",
        }
    }

    /// Maximum number of topics accepted in this mode, if bounded.
    pub fn topic_limit(&self) -> Option<usize> {
        match self {
            LengthMode::Standard => None,
            LengthMode::Advanced => Some(1),
        }
    }
}

impl fmt::Display for LengthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LengthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(LengthMode::Standard),
            "advanced" => Ok(LengthMode::Advanced),
            other => Err(format!("unknown length mode `{other}` (expected standard or advanced)")),
        }
    }
}

/// Body of `POST /api/generate_newspaper`.
///
/// `topics` keeps the order of the fields on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Trimmed, non-empty topics in field order.
    pub topics: Vec<String>,
    /// Layout template identifier, e.g. `layout_1.html`.
    pub layout: String,
    /// Output language.
    pub language: String,
    /// Length mode.
    pub length: LengthMode,
}

/// Backend answer to a generation request.
///
/// Only `path` is recognized; anything else in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerateResponse {
    /// Location of the generated newspaper, relative to the server.
    #[serde(default)]
    pub path: Option<String>,
}
