use std::fmt;

use tracing::{debug, info, warn};

use crate::client::{IntakeClient, SubmissionError};
use crate::models::application::{optional_text, ApplicationForm, ApplicationPayload};
use crate::services::validation::{self, ValidationError};

/// Where the applicant is in the three-step funnel, plus the two
/// submission states. `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStep {
    Step1,
    Step2,
    Step3,
    Submitting,
    Submitted,
}

impl FormStep {
    /// Step number used by the validation rules; submission states have none.
    fn number(&self) -> Option<u8> {
        match self {
            FormStep::Step1 => Some(1),
            FormStep::Step2 => Some(2),
            FormStep::Step3 => Some(3),
            FormStep::Submitting | FormStep::Submitted => None,
        }
    }
}

/// Why a submit attempt did not go through.
#[derive(Debug)]
pub enum SubmitError {
    /// A step failed re-validation, or submit was attempted off the final
    /// step. The flow stays where it is.
    Validation(ValidationError),
    /// The gateway call failed. The flow is back on Step3 with all field
    /// values intact so the applicant can retry.
    Submission(SubmissionError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Validation(e) => write!(f, "validation failed: {}", e),
            SubmitError::Submission(e) => write!(f, "submission failed: {}", e),
        }
    }
}

impl std::error::Error for SubmitError {}

/// The application funnel's state machine: the current step and the one
/// form record, owned here and mutated only through these transitions.
#[derive(Debug)]
pub struct ApplicationFlow {
    step: FormStep,
    form: ApplicationForm,
}

impl Default for ApplicationFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationFlow {
    pub fn new() -> Self {
        Self {
            step: FormStep::Step1,
            form: ApplicationForm::default(),
        }
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    pub fn form(&self) -> &ApplicationForm {
        &self.form
    }

    /// Mutable access for field edits. Edits are allowed on any step,
    /// including while a submission is in flight; only the transitions
    /// below are guarded.
    pub fn form_mut(&mut self) -> &mut ApplicationForm {
        &mut self.form
    }

    /// Advance to the next step if the current one validates. On failure
    /// the step is unchanged and the first failing field is returned.
    pub fn next(&mut self) -> Result<(), ValidationError> {
        let target = match self.step {
            FormStep::Step1 => FormStep::Step2,
            FormStep::Step2 => FormStep::Step3,
            // Step3 submits instead of advancing; submission states are fixed.
            FormStep::Step3 | FormStep::Submitting | FormStep::Submitted => return Ok(()),
        };

        if let Some(number) = self.step.number() {
            validation::validate_step(&self.form, number)?;
        }

        debug!("Advancing application flow from {:?} to {:?}", self.step, target);
        self.step = target;
        Ok(())
    }

    /// Go back one step. Never validates and never loses field values.
    pub fn back(&mut self) {
        let target = match self.step {
            FormStep::Step2 => FormStep::Step1,
            FormStep::Step3 => FormStep::Step2,
            FormStep::Step1 | FormStep::Submitting | FormStep::Submitted => return,
        };
        self.step = target;
    }

    /// Start a submission: re-validate every step against the current field
    /// values, then move to `Submitting` and hand back the payload to send.
    ///
    /// All three steps are checked again even though each passed on the way
    /// through, in case fields were edited after their step validated.
    pub fn begin_submit(&mut self) -> Result<ApplicationPayload, ValidationError> {
        if self.step != FormStep::Step3 {
            warn!("Submit attempted from {:?}", self.step);
            return Err(ValidationError {
                field: "step",
                message: "Submission is only available from the final step",
            });
        }

        for number in 1..=3 {
            validation::validate_step(&self.form, number)?;
        }

        let payload = self.payload()?;
        self.step = FormStep::Submitting;
        Ok(payload)
    }

    /// Record the gateway's outcome. Success reaches the terminal
    /// `Submitted` state and discards the form; failure returns to Step3
    /// with everything the applicant typed still in place.
    pub fn complete_submit(
        &mut self,
        outcome: Result<(), SubmissionError>,
    ) -> Result<(), SubmissionError> {
        if self.step != FormStep::Submitting {
            return outcome;
        }

        match outcome {
            Ok(()) => {
                info!("Application submitted, flow is now terminal");
                self.step = FormStep::Submitted;
                self.form = ApplicationForm::default();
                Ok(())
            }
            Err(e) => {
                warn!("Submission failed, returning to final step: {}", e);
                self.step = FormStep::Step3;
                Err(e)
            }
        }
    }

    /// Run a full submission through the gateway. The await on the gateway
    /// call is the flow's only suspension point; there is no cancellation
    /// once the request is in flight.
    pub async fn submit(&mut self, gateway: &IntakeClient) -> Result<(), SubmitError> {
        let payload = self.begin_submit().map_err(SubmitError::Validation)?;
        let outcome = gateway.submit_application(&payload).await;
        self.complete_submit(outcome).map_err(SubmitError::Submission)
    }

    // Payload assembly; callers have already validated every step, so the
    // radio answers are known to be present.
    fn payload(&self) -> Result<ApplicationPayload, ValidationError> {
        let form = &self.form;

        let (Some(training_level), Some(is_competitive), Some(has_worked_with_coach)) = (
            form.training_level,
            form.is_competitive,
            form.has_worked_with_coach,
        ) else {
            return Err(ValidationError {
                field: "trainingLevel",
                message: "Please answer every background question",
            });
        };

        let age = form.age.trim().parse::<i32>().map_err(|_| ValidationError {
            field: "age",
            message: "Please enter an age between 13 and 100",
        })?;

        Ok(ApplicationPayload {
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            age,
            country_timezone: form.country_timezone.trim().to_string(),
            training_level,
            is_competitive,
            training_history: form.training_history.trim().to_string(),
            has_worked_with_coach,
            coach_experience: optional_text(&form.coach_experience),
            why_work_with_me: optional_text(&form.why_work_with_me),
            short_term_goals: form.short_term_goals.trim().to_string(),
            long_term_goals: form.long_term_goals.trim().to_string(),
            motivation: form.motivation.trim().to_string(),
            gdpr_consent: form.gdpr_consent,
        })
    }
}
