//! The form controller: page events in, form mutations and one request out.
//!
//! [`FormEvents`] is the capability interface a front-end wires its events
//! to. [`DeskController`] implements it on top of a [`TopicForm`], a
//! [`GenerateAsync`] backend and a [`Page`].
//!
//! # Submission State Machine
//!
//! ```text
//! idle ──submit──▶ validating ──invalid──▶ idle (alert)
//!                      │
//!                      └──valid──▶ in-flight ──path──▶ navigated
//!                                      └──no path / error──▶ failed
//! ```
//!
//! While a request is in flight further submissions are refused without
//! touching the network. Other handlers keep working.

use crate::api::GenerateAsync;
use crate::error::{FormError, SubmitError};
use crate::form::TopicForm;
use crate::loading::LoadingIndicator;
use crate::models::LengthMode;
use crate::page::Page;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{error, info, instrument, warn};

/// Where the most recent submission stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    InFlight,
    Navigated,
    Failed,
}

/// Events a front-end forwards to the controller.
pub trait FormEvents {
    /// The "+" control was clicked. Returns the new field's id.
    fn on_add(&self) -> Result<usize, FormError>;
    /// The "-" control of field `field_id` was clicked.
    fn on_remove(&self, field_id: usize) -> Result<(), FormError>;
    /// Text was typed into field `field_id`.
    fn on_topic_input(&self, field_id: usize, text: &str) -> Result<(), FormError>;
    /// A layout icon was clicked.
    fn on_layout_pick(&self, layout: &str) -> Result<(), FormError>;
    /// The language select changed.
    fn on_language_change(&self, language: &str) -> Result<(), FormError>;
    /// The length select changed.
    fn on_length_change(&self, mode: LengthMode);
    /// The produce button was clicked. Returns the path navigated to.
    async fn on_submit(&self) -> Result<String, SubmitError>;
}

/// The concrete [`FormEvents`] implementation.
///
/// Owns the form state and the submission phase behind mutexes so handlers
/// can run while a submission is awaiting the backend.
pub struct DeskController<G, P> {
    form: Mutex<TopicForm>,
    phase: Mutex<SubmissionPhase>,
    generator: G,
    page: Arc<P>,
    loading: LoadingIndicator,
}

impl<G, P> DeskController<G, P>
where
    G: GenerateAsync,
    P: Page + 'static,
{
    /// Wire a controller to its form, backend and page.
    ///
    /// # Arguments
    ///
    /// * `form` - Form state as of page load
    /// * `generator` - Backend that produces newspapers
    /// * `page` - Where alerts, loading messages and navigation go
    /// * `loading` - Rotation settings for the loading messages
    pub fn new(form: TopicForm, generator: G, page: Arc<P>, loading: LoadingIndicator) -> Self {
        Self {
            form: Mutex::new(form),
            phase: Mutex::new(SubmissionPhase::Idle),
            generator,
            page,
            loading,
        }
    }

    /// Copy of the current form state, for rendering.
    pub fn snapshot(&self) -> TopicForm {
        self.form().clone()
    }

    /// Phase of the most recent submission.
    pub fn phase(&self) -> SubmissionPhase {
        *self.phase_lock()
    }

    /// Whether the produce action is currently enabled.
    pub fn can_submit(&self) -> bool {
        !matches!(self.phase(), SubmissionPhase::Validating | SubmissionPhase::InFlight)
    }

    fn form(&self) -> MutexGuard<'_, TopicForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn phase_lock(&self) -> MutexGuard<'_, SubmissionPhase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim the submit action. `None` if a submission is already running.
    fn begin_submission(&self) -> Option<SubmissionGuard<'_>> {
        let mut phase = self.phase_lock();
        if matches!(*phase, SubmissionPhase::Validating | SubmissionPhase::InFlight) {
            warn!(phase = ?*phase, "Submit ignored while a request is outstanding");
            return None;
        }
        *phase = SubmissionPhase::Validating;
        Some(SubmissionGuard { phase: &self.phase, settled: false })
    }

    fn alerting<T>(&self, result: Result<T, FormError>) -> Result<T, FormError> {
        if let Err(e) = &result {
            self.page.alert(&e.to_string());
        }
        result
    }
}

/// Holds the submit action while a submission runs.
///
/// Settling records the final phase. Dropping it unsettled (the submit
/// future was cancelled) puts the phase back to `Idle` so submit is enabled
/// again.
struct SubmissionGuard<'a> {
    phase: &'a Mutex<SubmissionPhase>,
    settled: bool,
}

impl SubmissionGuard<'_> {
    fn advance(&self, next: SubmissionPhase) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    fn settle(mut self, last: SubmissionPhase) {
        self.advance(last);
        self.settled = true;
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Submission abandoned before it settled");
            self.advance(SubmissionPhase::Idle);
        }
    }
}

impl<G, P> FormEvents for DeskController<G, P>
where
    G: GenerateAsync,
    P: Page + 'static,
{
    fn on_add(&self) -> Result<usize, FormError> {
        let result = self.form().add_field();
        self.alerting(result)
    }

    fn on_remove(&self, field_id: usize) -> Result<(), FormError> {
        let result = self.form().remove_field(field_id);
        self.alerting(result)
    }

    fn on_topic_input(&self, field_id: usize, text: &str) -> Result<(), FormError> {
        let result = self.form().set_topic(field_id, text);
        self.alerting(result)
    }

    fn on_layout_pick(&self, layout: &str) -> Result<(), FormError> {
        let result = self.form().pick_layout(layout);
        if result.is_ok() {
            info!(layout, "Layout selected");
        }
        self.alerting(result)
    }

    fn on_language_change(&self, language: &str) -> Result<(), FormError> {
        let result = self.form().set_language(language);
        self.alerting(result)
    }

    fn on_length_change(&self, mode: LengthMode) {
        let dropped = self.form().set_length(mode);
        self.page.set_length_warning(mode == LengthMode::Advanced);
        if dropped > 0 {
            info!(%mode, dropped, "Collapsed topic fields for length mode");
        }
    }

    #[instrument(level = "info", skip_all)]
    async fn on_submit(&self) -> Result<String, SubmitError> {
        let Some(submission) = self.begin_submission() else {
            return Err(SubmitError::AlreadyInFlight);
        };

        let built = self.form().build_request();
        let request = match built {
            Ok(request) => request,
            Err(e) => {
                self.page.alert(&e.to_string());
                submission.settle(SubmissionPhase::Idle);
                return Err(e.into());
            }
        };

        submission.advance(SubmissionPhase::InFlight);
        info!(
            topics = request.topics.len(),
            layout = %request.layout,
            language = %request.language,
            length = %request.length,
            "Submitting newspaper request"
        );

        let loading = self.loading.start(self.page.clone());
        let result = self.generator.generate(&request).await;
        loading.finish();

        match result {
            Ok(response) => match response.path {
                Some(path) => {
                    info!(%path, "Newspaper ready; navigating");
                    self.page.navigate(&path);
                    submission.settle(SubmissionPhase::Navigated);
                    Ok(path)
                }
                None => {
                    error!("Error: Newspaper path not found");
                    submission.settle(SubmissionPhase::Failed);
                    Err(SubmitError::MissingPath)
                }
            },
            Err(e) => {
                error!(error = %e, "Newspaper request failed");
                submission.settle(SubmissionPhase::Failed);
                Err(e.into())
            }
        }
    }
}
