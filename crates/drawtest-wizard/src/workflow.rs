/*
[INPUT]:  User intents (upload, submit, check report, restart), TaskApi, TaskStore
[OUTPUT]: Store transitions around each network call and a step outcome for the UI
[POS]:    Orchestration layer - reads state, calls the service, dispatches results
[UPDATE]: When adding wizard steps or changing how failures surface
*/

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use drawtest_adapter::TaskApi;
use tracing::{info, warn};

use crate::answers::{Answers, ValidationIssue};
use crate::photos::PhotoSlots;
use crate::questionnaire::Questionnaire;
use crate::store::{
    Action, DispatchError, DispatchGuard, MISSING_TASK_ID, ReportStatus, TaskStore,
};

/// How a step ended, for transient notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    /// The service call failed; the message is also in the store
    Failed(String),
    /// Refused locally before any call
    Rejected(String),
    /// Answers failed validation; nothing was sent
    Incomplete(Vec<ValidationIssue>),
    /// The task changed while the call was in flight; its result was dropped
    Stale,
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Succeeded)
    }
}

pub struct Workflow {
    api: Arc<dyn TaskApi>,
    store: Arc<TaskStore>,
    questionnaire: Arc<Questionnaire>,
}

impl Workflow {
    pub fn new(api: Arc<dyn TaskApi>, store: Arc<TaskStore>, questionnaire: Arc<Questionnaire>) -> Self {
        Self {
            api,
            store,
            questionnaire,
        }
    }

    pub fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }

    pub fn questionnaire(&self) -> &Arc<Questionnaire> {
        &self.questionnaire
    }

    /// Create the remote task from three drawings
    pub async fn upload_photos(&self, slots: &PhotoSlots) -> StepOutcome {
        let Some(images) = slots.images() else {
            return StepOutcome::Rejected(format!(
                "Select all three drawings first ({} of 3 selected)",
                slots.filled_count()
            ));
        };

        let guard = self.store.guard();
        if let Err(err) = self.store.dispatch(Action::BeginUpload) {
            return StepOutcome::Rejected(err.to_string());
        }

        let action = match self.api.create_task(&images).await {
            Ok(created) => {
                info!(task_id = %created.task_id, "drawings uploaded");
                Action::UploadSucceeded {
                    task_id: created.task_id,
                    photos: images,
                }
            }
            Err(err) => {
                warn!(kind = %err.kind(), error = %err, "upload failed");
                Action::UploadFailed(err.message().to_string())
            }
        };
        self.settle(&guard, action)
    }

    /// Submit answers against the current task, dated today
    pub async fn submit_answers(&self, answers: Answers) -> StepOutcome {
        self.submit_answers_on(answers, Local::now().date_naive()).await
    }

    pub async fn submit_answers_on(&self, answers: Answers, today: NaiveDate) -> StepOutcome {
        let snapshot = self.store.snapshot();
        let Some(task_id) = snapshot.task_id.clone() else {
            warn!("answers submitted without a task");
            return StepOutcome::Rejected(MISSING_TASK_ID.to_string());
        };

        let mut merged = snapshot.answers.clone();
        merged.merge(&answers);
        let issues = merged.validate(&self.questionnaire, today);
        if !issues.is_empty() {
            return StepOutcome::Incomplete(issues);
        }

        let guard = self.store.guard();
        if let Err(err) = self.store.dispatch(Action::SetAnswers(answers)) {
            return StepOutcome::Rejected(err.to_string());
        }
        if let Err(err) = self.store.dispatch(Action::BeginSubmit) {
            return StepOutcome::Rejected(err.to_string());
        }

        let payload = self.store.snapshot().answers.to_payload();
        let action = match self.api.submit_answers(&task_id, payload).await {
            Ok(_) => {
                info!(task_id = %task_id, "answers submitted");
                Action::SubmitSucceeded
            }
            Err(err) => {
                warn!(task_id = %task_id, kind = %err.kind(), error = %err, "submit failed");
                Action::SubmitFailed(err.message().to_string())
            }
        };
        self.settle(&guard, action)
    }

    /// One report status check; also the manual retry after a failure
    pub async fn check_report_status(&self) -> StepOutcome {
        let guard = self.store.guard();
        let Some(task_id) = guard.task_id.clone() else {
            return StepOutcome::Rejected(MISSING_TASK_ID.to_string());
        };
        if let Err(err) = self.store.dispatch(Action::BeginStatusCheck) {
            return StepOutcome::Rejected(err.to_string());
        }

        let action = match self.api.poll_status(&task_id).await {
            Ok(report) => Action::StatusCheckSucceeded {
                status: report.status,
                report_url: report.report_url,
            },
            Err(err) => {
                warn!(task_id = %task_id, kind = %err.kind(), error = %err, "status check failed");
                Action::StatusCheckFailed(err.message().to_string())
            }
        };

        match self.settle(&guard, action) {
            StepOutcome::Succeeded => {
                let state = self.store.snapshot();
                match state.report_status {
                    ReportStatus::Failed => StepOutcome::Failed(state.error.unwrap_or_default()),
                    ReportStatus::Ready => {
                        info!(task_id = %task_id, "report ready");
                        StepOutcome::Succeeded
                    }
                    _ => StepOutcome::Succeeded,
                }
            }
            other => other,
        }
    }

    /// Drop the task and everything collected for it
    pub fn restart(&self) {
        if let Err(err) = self.store.dispatch(Action::Reset) {
            warn!(error = %err, "reset rejected");
        }
        info!("wizard restarted");
    }

    /// Apply the result of a call made for `guard`'s task
    fn settle(&self, guard: &DispatchGuard, action: Action) -> StepOutcome {
        let failure = match &action {
            Action::UploadFailed(message)
            | Action::SubmitFailed(message)
            | Action::StatusCheckFailed(message) => Some(message.clone()),
            _ => None,
        };

        match self.store.dispatch_guarded(guard, action) {
            Ok(()) => match failure {
                Some(message) => StepOutcome::Failed(message),
                None => StepOutcome::Succeeded,
            },
            Err(DispatchError::Stale) => StepOutcome::Stale,
            Err(DispatchError::Transition(err)) => StepOutcome::Rejected(err.to_string()),
        }
    }
}
