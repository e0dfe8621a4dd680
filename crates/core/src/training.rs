//! Training form: pick or type a person name, supply an image URL, submit.
//!
//! Validation failures and backend failures both keep the entered values;
//! only a successful submission clears the form and shows a confirmation,
//! which the session layer dismisses after a fixed delay.

use crate::error::CoreError;
use crate::validation::{is_filled, NonBlank};

pub const PERSON_NAME_REQUIRED: &str = "Person name is required";
pub const IMAGE_URL_REQUIRED: &str = "Training image URL is required";
pub const TRAINING_CONFIRMATION: &str = "Training image added successfully";

/// How the person name is provided.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PersonChoice {
    #[default]
    Unselected,
    /// A name picked from the subjects list.
    Existing(String),
    /// The "create new subject" option with the name typed so far.
    New(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrainingForm {
    pub choice: PersonChoice,
    pub image_url: String,
}

impl TrainingForm {
    /// The name that would be submitted, untrimmed.
    pub fn person_name(&self) -> &str {
        match &self.choice {
            PersonChoice::Unselected => "",
            PersonChoice::Existing(name) | PersonChoice::New(name) => name,
        }
    }

    /// Mirrors the disabled state of the submit control.
    pub fn can_submit(&self) -> bool {
        is_filled(self.person_name()) && is_filled(&self.image_url)
    }

    pub fn validate(&self) -> Result<TrainingSubmission, CoreError> {
        let person_name = NonBlank::parse(self.person_name(), PERSON_NAME_REQUIRED)?;
        let image_url = NonBlank::parse(&self.image_url, IMAGE_URL_REQUIRED)?;
        Ok(TrainingSubmission {
            person_name,
            image_url,
        })
    }
}

/// Validated, trimmed values ready for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingSubmission {
    pub person_name: NonBlank,
    pub image_url: NonBlank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingRequest {
    pub epoch: u64,
    pub submission: TrainingSubmission,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingStatus {
    Editing { error: Option<String> },
    Submitting { epoch: u64 },
    Confirmed { epoch: u64 },
}

/// Result of [`TrainingFlow::finish_submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingCompletion {
    Confirmed { epoch: u64 },
    Failed,
    Stale,
}

#[derive(Debug)]
pub struct TrainingFlow {
    form: TrainingForm,
    status: TrainingStatus,
    next_epoch: u64,
}

impl Default for TrainingFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingFlow {
    pub fn new() -> Self {
        Self {
            form: TrainingForm::default(),
            status: TrainingStatus::Editing { error: None },
            next_epoch: 1,
        }
    }

    pub fn form(&self) -> &TrainingForm {
        &self.form
    }

    pub fn status(&self) -> &TrainingStatus {
        &self.status
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            TrainingStatus::Editing { error } => error.as_deref(),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.status, TrainingStatus::Submitting { .. })
    }

    fn edit(&mut self) -> Result<&mut TrainingForm, CoreError> {
        if self.is_submitting() {
            return Err(CoreError::Conflict(
                "the form is locked while training is submitted".into(),
            ));
        }
        Ok(&mut self.form)
    }

    /// Pick a subject, or switch to typing a new one. Clears a shown error.
    pub fn choose(&mut self, choice: PersonChoice) -> Result<(), CoreError> {
        self.edit()?.choice = choice;
        if let TrainingStatus::Editing { error } = &mut self.status {
            *error = None;
        }
        Ok(())
    }

    pub fn set_image_url(&mut self, url: &str) -> Result<(), CoreError> {
        self.edit()?.image_url = url.to_string();
        Ok(())
    }

    /// Validate and lock the form for submission.
    ///
    /// On a validation failure the message is shown and the form stays
    /// editable with its values intact.
    pub fn begin_submit(&mut self) -> Result<TrainingRequest, CoreError> {
        if self.is_submitting() {
            return Err(CoreError::Conflict("training is already being submitted".into()));
        }

        let submission = match self.form.validate() {
            Ok(submission) => submission,
            Err(e) => {
                self.status = TrainingStatus::Editing {
                    error: Some(e.to_string()),
                };
                return Err(e);
            }
        };

        let epoch = self.next_epoch;
        self.next_epoch += 1;
        self.status = TrainingStatus::Submitting { epoch };
        Ok(TrainingRequest { epoch, submission })
    }

    /// Record the backend's answer for `request`.
    pub fn finish_submit(
        &mut self,
        request: &TrainingRequest,
        outcome: Result<(), String>,
    ) -> TrainingCompletion {
        if self.status != (TrainingStatus::Submitting { epoch: request.epoch }) {
            return TrainingCompletion::Stale;
        }

        match outcome {
            Ok(()) => {
                self.form = TrainingForm::default();
                self.status = TrainingStatus::Confirmed {
                    epoch: request.epoch,
                };
                TrainingCompletion::Confirmed {
                    epoch: request.epoch,
                }
            }
            Err(message) => {
                self.status = TrainingStatus::Editing {
                    error: Some(message),
                };
                TrainingCompletion::Failed
            }
        }
    }

    /// Hide the confirmation shown for `epoch`. Returns `false` when a
    /// newer submission has replaced it.
    pub fn dismiss_confirmation(&mut self, epoch: u64) -> bool {
        if self.status != (TrainingStatus::Confirmed { epoch }) {
            return false;
        }
        self.status = TrainingStatus::Editing { error: None };
        true
    }

    /// Drop everything entered and return to a clean form.
    pub fn reset(&mut self) {
        self.form = TrainingForm::default();
        self.status = TrainingStatus::Editing { error: None };
    }
}
