/*
[INPUT]:  Current TaskState and an Action
[OUTPUT]: Next TaskState or a TransitionError leaving state untouched
[POS]:    Store layer - pure transition function
[UPDATE]: When status transitions or their guards change
*/

use drawtest_adapter::RemoteReportStatus;
use thiserror::Error;

use super::action::Action;
use super::state::{PhaseStatus, ReportStatus, TaskState};

/// Shown when the service reports that generation failed
pub const REPORT_GENERATION_FAILED: &str = "Report generation failed";

/// Shown when answers are submitted before a task exists
pub const MISSING_TASK_ID: &str = "Task ID not found, upload photos again";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("invalid transition: {action} while {field} is {status}")]
    Invalid {
        action: &'static str,
        field: &'static str,
        status: String,
    },
    #[error("Task ID not found, upload photos again")]
    MissingTaskId,
    #[error("a report status check is already in flight")]
    CheckInFlight,
    #[error("upload carried {0} photos, at most 3 allowed")]
    TooManyPhotos(usize),
}

fn invalid(action: &Action, field: &'static str, status: impl ToString) -> TransitionError {
    TransitionError::Invalid {
        action: action.name(),
        field,
        status: status.to_string(),
    }
}

/// Apply an action. No I/O, no clock; the same inputs always give the same result.
pub fn reduce(state: &TaskState, action: &Action) -> Result<TaskState, TransitionError> {
    let mut next = state.clone();

    match action {
        Action::BeginUpload => match state.upload_status {
            PhaseStatus::Idle | PhaseStatus::Failed => {
                next.upload_status = PhaseStatus::Loading;
                next.error = None;
            }
            status => return Err(invalid(action, "upload_status", status)),
        },
        Action::UploadSucceeded { task_id, photos } => {
            if state.upload_status != PhaseStatus::Loading {
                return Err(invalid(action, "upload_status", state.upload_status));
            }
            if photos.len() > 3 {
                return Err(TransitionError::TooManyPhotos(photos.len()));
            }
            next.upload_status = PhaseStatus::Succeeded;
            next.task_id = Some(task_id.clone());
            next.photos = photos.clone();
            next.error = None;
        }
        Action::UploadFailed(message) => {
            if state.upload_status != PhaseStatus::Loading {
                return Err(invalid(action, "upload_status", state.upload_status));
            }
            next.upload_status = PhaseStatus::Failed;
            next.error = Some(message.clone());
        }
        Action::BeginSubmit => {
            if state.task_id.is_none() {
                return Err(TransitionError::MissingTaskId);
            }
            match state.submit_status {
                PhaseStatus::Idle | PhaseStatus::Failed => {
                    next.submit_status = PhaseStatus::Loading;
                    next.error = None;
                }
                status => return Err(invalid(action, "submit_status", status)),
            }
        }
        Action::SubmitSucceeded => {
            if state.submit_status != PhaseStatus::Loading {
                return Err(invalid(action, "submit_status", state.submit_status));
            }
            next.submit_status = PhaseStatus::Succeeded;
            next.error = None;
            if state.report_status == ReportStatus::Idle {
                next.report_status = ReportStatus::Processing;
            }
        }
        Action::SubmitFailed(message) => {
            if state.submit_status != PhaseStatus::Loading {
                return Err(invalid(action, "submit_status", state.submit_status));
            }
            next.submit_status = PhaseStatus::Failed;
            next.error = Some(message.clone());
        }
        Action::BeginStatusCheck => {
            if state.task_id.is_none() {
                return Err(TransitionError::MissingTaskId);
            }
            if state.submit_status != PhaseStatus::Succeeded {
                return Err(invalid(action, "submit_status", state.submit_status));
            }
            if state.report_check_in_flight {
                return Err(TransitionError::CheckInFlight);
            }
            match state.report_status {
                ReportStatus::Processing | ReportStatus::Failed => {
                    next.report_status = ReportStatus::Processing;
                    next.report_check_in_flight = true;
                    next.error = None;
                }
                status => return Err(invalid(action, "report_status", status)),
            }
        }
        Action::StatusCheckSucceeded { status, report_url } => {
            if !state.report_check_in_flight {
                return Err(invalid(action, "report_status", "not checking"));
            }
            next.report_check_in_flight = false;
            match (status, report_url) {
                (RemoteReportStatus::Completed, Some(url)) => {
                    next.report_status = ReportStatus::Ready;
                    next.report_url = Some(url.clone());
                }
                // Completed without a URL is not ready yet
                (RemoteReportStatus::Completed, None) | (RemoteReportStatus::Processing, _) => {
                    next.report_status = ReportStatus::Processing;
                }
                (RemoteReportStatus::Error, _) => {
                    next.report_status = ReportStatus::Failed;
                    next.error = Some(REPORT_GENERATION_FAILED.to_string());
                }
            }
        }
        Action::StatusCheckFailed(message) => {
            if !state.report_check_in_flight {
                return Err(invalid(action, "report_status", "not checking"));
            }
            next.report_check_in_flight = false;
            next.report_status = ReportStatus::Failed;
            next.error = Some(message.clone());
        }
        Action::SetAnswers(answers) => {
            // Answers are frozen once a submission is in flight or accepted
            match state.submit_status {
                PhaseStatus::Idle | PhaseStatus::Failed => next.answers.merge(answers),
                status => return Err(invalid(action, "submit_status", status)),
            }
        }
        Action::ClearError => {
            next.error = None;
        }
        Action::Reset => {
            next = TaskState::default();
        }
    }

    Ok(next)
}
