/*
[INPUT]:  User intents and resolved network calls
[OUTPUT]: Closed set of store actions
[POS]:    Store layer - dispatch surface
[UPDATE]: When adding store transitions
*/

use drawtest_adapter::{ImageFile, RemoteReportStatus};

use crate::answers::Answers;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    BeginUpload,
    UploadSucceeded {
        task_id: String,
        photos: Vec<ImageFile>,
    },
    UploadFailed(String),
    BeginSubmit,
    SubmitSucceeded,
    SubmitFailed(String),
    BeginStatusCheck,
    StatusCheckSucceeded {
        status: RemoteReportStatus,
        report_url: Option<String>,
    },
    StatusCheckFailed(String),
    SetAnswers(Answers),
    ClearError,
    Reset,
}

impl Action {
    /// Stable name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::BeginUpload => "begin_upload",
            Action::UploadSucceeded { .. } => "upload_succeeded",
            Action::UploadFailed(_) => "upload_failed",
            Action::BeginSubmit => "begin_submit",
            Action::SubmitSucceeded => "submit_succeeded",
            Action::SubmitFailed(_) => "submit_failed",
            Action::BeginStatusCheck => "begin_status_check",
            Action::StatusCheckSucceeded { .. } => "status_check_succeeded",
            Action::StatusCheckFailed(_) => "status_check_failed",
            Action::SetAnswers(_) => "set_answers",
            Action::ClearError => "clear_error",
            Action::Reset => "reset",
        }
    }
}
