//! Client for the newspaper generation backend.
//!
//! The module uses a trait-based design so the controller can be exercised
//! without a server:
//! - [`GenerateAsync`]: core trait for one generation round trip
//! - [`HttpGenerator`]: `POST /api/generate_newspaper` over `reqwest`
//!
//! # Request Policy
//!
//! One request per submission. There is no retry and no request timeout: the
//! backend can take minutes to write an edition, and the page waits for it.

use crate::error::ApiError;
use crate::models::{GenerateRequest, GenerateResponse};
use crate::utils::truncate_for_log;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Path of the generation endpoint, relative to the server root.
pub const GENERATE_PATH: &str = "/api/generate_newspaper";

/// Trait for async newspaper generation.
///
/// Implementors send a validated request to whatever produces newspapers
/// and hand back its answer.
pub trait GenerateAsync {
    /// Submit `request` and wait for the backend's answer.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError>;
}

/// [`GenerateAsync`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpGenerator {
    /// Build a generator talking to the server rooted at `server`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL cannot be derived from `server`
    /// or the HTTP client cannot be built.
    pub fn new(server: &Url) -> Result<Self, ApiError> {
        let endpoint = server.join(GENERATE_PATH)?;
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl GenerateAsync for HttpGenerator {
    #[instrument(level = "info", skip_all, fields(endpoint = %self.endpoint, topics = request.topics.len()))]
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError> {
        let t0 = Instant::now();
        let response = self.client.post(self.endpoint.clone()).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let dt = t0.elapsed();

        if !status.is_success() {
            warn!(
                %status,
                elapsed_ms = dt.as_millis() as u64,
                body_preview = %truncate_for_log(&body, 300),
                "Backend answered with a non-success status"
            );
        }

        let parsed = serde_json::from_str::<GenerateResponse>(&body).map_err(|e| {
            debug!(body_preview = %truncate_for_log(&body, 300), "Response body");
            ApiError::Decode(e)
        })?;
        info!(%status, elapsed_ms = dt.as_millis() as u64, has_path = parsed.path.is_some(), "Generation request settled");
        Ok(parsed)
    }
}
