//! Training session: drives [`TrainingFlow`] against the backend and
//! dismisses the success confirmation after a fixed delay.

use std::sync::Arc;
use std::time::Duration;

use facewatch_core::training::{
    PersonChoice, TrainingCompletion, TrainingFlow, TrainingForm, TrainingStatus,
    TRAINING_CONFIRMATION,
};
use facewatch_gateway::FaceGateway;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::error::{display_or, FlowError};
use crate::subjects::SubjectsCache;

pub const TRAIN_FAILED: &str = "Failed to train subject";

/// Default time the confirmation stays visible.
pub const DEFAULT_CONFIRMATION_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingView {
    pub form: TrainingForm,
    /// Existing subjects offered in the picker.
    pub subjects: Vec<String>,
    /// The picker is disabled while subjects are loading.
    pub subjects_loading: bool,
    pub error: Option<String>,
    pub confirmation: Option<&'static str>,
    pub submitting: bool,
    pub can_submit: bool,
}

pub struct TrainingSession {
    gateway: Arc<dyn FaceGateway>,
    subjects: Arc<SubjectsCache>,
    flow: Arc<RwLock<TrainingFlow>>,
    confirmation_delay: Duration,
    /// Stops pending confirmation timers when the session is torn down.
    cancel: CancellationToken,
}

impl TrainingSession {
    pub fn new(
        gateway: Arc<dyn FaceGateway>,
        subjects: Arc<SubjectsCache>,
        confirmation_delay: Duration,
    ) -> Self {
        Self {
            gateway,
            subjects,
            flow: Arc::new(RwLock::new(TrainingFlow::new())),
            confirmation_delay,
            cancel: CancellationToken::new(),
        }
    }

    pub async fn view(&self) -> TrainingView {
        let flow = self.flow.read().await;
        let subjects = self.subjects.snapshot();
        TrainingView {
            form: flow.form().clone(),
            subjects: subjects.subjects,
            subjects_loading: subjects.loading,
            error: flow.error().map(str::to_string),
            confirmation: matches!(flow.status(), TrainingStatus::Confirmed { .. })
                .then_some(TRAINING_CONFIRMATION),
            submitting: flow.is_submitting(),
            can_submit: !flow.is_submitting() && flow.form().can_submit(),
        }
    }

    /// Select a subject from the cache.
    pub async fn choose_existing(&self, name: &str) -> Result<(), FlowError> {
        self.choose(PersonChoice::Existing(name.to_string())).await
    }

    /// Switch to "create new subject" with `name` typed.
    pub async fn choose_new(&self, name: &str) -> Result<(), FlowError> {
        self.choose(PersonChoice::New(name.to_string())).await
    }

    async fn choose(&self, choice: PersonChoice) -> Result<(), FlowError> {
        self.flow.write().await.choose(choice)?;
        Ok(())
    }

    pub async fn set_image_url(&self, url: &str) -> Result<(), FlowError> {
        self.flow.write().await.set_image_url(url)?;
        Ok(())
    }

    /// Validate and send the training pair.
    ///
    /// Validation failures never reach the backend. Backend failures keep
    /// the entered values and show the server text. Success clears the form
    /// and schedules the confirmation to disappear.
    pub async fn submit(&self) -> Result<TrainingCompletion, FlowError> {
        let request = self.flow.write().await.begin_submit()?;
        let submission = &request.submission;

        tracing::info!(person_name = %submission.person_name, "Submitting training image");
        let result = self
            .gateway
            .train_subject(&submission.person_name, &submission.image_url)
            .await;

        let outcome = match &result {
            Ok(()) => Ok(()),
            Err(e) => Err(display_or(e, TRAIN_FAILED)),
        };
        let completion = self.flow.write().await.finish_submit(&request, outcome);

        match (completion, result) {
            (TrainingCompletion::Confirmed { epoch }, _) => {
                self.schedule_dismiss(epoch);
                Ok(completion)
            }
            (TrainingCompletion::Failed, Err(e)) => {
                tracing::error!(error = %e, "Failed to train subject");
                Err(e.into())
            }
            (TrainingCompletion::Failed, Ok(())) => Ok(completion),
            (TrainingCompletion::Stale, _) => {
                tracing::debug!(epoch = request.epoch, "Discarding stale training result");
                Ok(completion)
            }
        }
    }

    fn schedule_dismiss(&self, epoch: u64) {
        let flow = Arc::clone(&self.flow);
        let cancel = self.cancel.clone();
        let delay = self.confirmation_delay;

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if flow.write().await.dismiss_confirmation(epoch) {
                        tracing::debug!(epoch, "Training confirmation dismissed");
                    }
                }
            }
        });
    }

    /// Abandon the form: clears it and makes any in-flight result stale.
    pub async fn reset(&self) {
        self.flow.write().await.reset();
    }

    /// Tear down: pending confirmation timers stop firing.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}
