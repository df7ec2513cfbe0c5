//! Optional YAML configuration for the desk.
//!
//! Everything has a default, so the file is only needed to point at another
//! server or to offer different layouts and languages. Command-line flags
//! override whatever the file says.
//!
//! ```yaml
//! server: http://127.0.0.1:5000
//! layouts: [layout_1.html, layout_2.html, layout_3.html]
//! default_layout: layout_1.html
//! languages: [english, spanish, french]
//! default_language: english
//! message_interval_secs: 12
//! ```

use crate::error::ConfigError;
use crate::models::{DEFAULT_LANGUAGE, DEFAULT_LAYOUT};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Root URL of the generation backend.
    pub server: String,
    /// Layout icons offered on the form, in display order.
    pub layouts: Vec<String>,
    pub default_layout: String,
    /// Options of the language select.
    pub languages: Vec<String>,
    pub default_language: String,
    /// Seconds between loading messages.
    pub message_interval_secs: u64,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            layouts: vec![
                "layout_1.html".to_string(),
                "layout_2.html".to_string(),
                "layout_3.html".to_string(),
            ],
            default_layout: DEFAULT_LAYOUT.to_string(),
            languages: vec![
                "english".to_string(),
                "spanish".to_string(),
                "french".to_string(),
                "german".to_string(),
                "italian".to_string(),
                "portuguese".to_string(),
            ],
            default_language: DEFAULT_LANGUAGE.to_string(),
            message_interval_secs: 12,
        }
    }
}

impl DeskConfig {
    /// Read and validate a YAML config file.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read { path: display.clone(), source })?;
        let config: DeskConfig = serde_yaml::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: display, source })?;
        config.validate()?;
        info!(layouts = config.layouts.len(), languages = config.languages.len(), "Loaded configuration");
        Ok(config)
    }

    /// Check that the config describes a form that can keep its invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The server is not a valid URL
    /// - `layouts` or `languages` is empty or lists an entry twice
    /// - `default_layout` or `default_language` is not listed
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server_url()?;
        check_options("layout", "layouts", &self.layouts, &self.default_layout)?;
        check_options("language", "languages", &self.languages, &self.default_language)?;
        Ok(())
    }

    pub fn server_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.server).map_err(|source| ConfigError::Server {
            url: self.server.clone(),
            source,
        })
    }
}

fn check_options(
    what: &'static str,
    plural: &'static str,
    options: &[String],
    default: &str,
) -> Result<(), ConfigError> {
    if options.is_empty() {
        return Err(ConfigError::Empty { what: plural });
    }
    if let Some(value) = options.iter().duplicates().next() {
        return Err(ConfigError::Duplicate { what, value: value.clone() });
    }
    if !options.iter().any(|o| o == default) {
        return Err(ConfigError::NotListed { what, value: default.to_string() });
    }
    Ok(())
}
