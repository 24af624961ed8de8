/*
[INPUT]:  Results of dispatched actions
[OUTPUT]: Task state snapshot read by screens, router and poller
[POS]:    Store layer - task state shape
[UPDATE]: When adding task fields or status values
*/

use std::fmt;

use drawtest_adapter::ImageFile;

use crate::answers::Answers;

/// Status of a request phase (upload, submit)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PhaseStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PhaseStatus::Idle => "idle",
            PhaseStatus::Loading => "loading",
            PhaseStatus::Succeeded => "succeeded",
            PhaseStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Report generation as seen by the wizard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReportStatus {
    #[default]
    Idle,
    Processing,
    Ready,
    Failed,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReportStatus::Idle => "idle",
            ReportStatus::Processing => "processing",
            ReportStatus::Ready => "ready",
            ReportStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Everything the wizard knows about the current task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskState {
    /// Assigned by the service on upload success
    pub task_id: Option<String>,
    /// Uploaded drawings in category order
    pub photos: Vec<ImageFile>,
    pub answers: Answers,
    pub upload_status: PhaseStatus,
    pub submit_status: PhaseStatus,
    pub report_status: ReportStatus,
    /// A status check was dispatched and has not resolved yet
    pub report_check_in_flight: bool,
    /// Set only once the report is ready
    pub report_url: Option<String>,
    /// Last human-readable failure
    pub error: Option<String>,
}

impl TaskState {
    pub fn is_initial(&self) -> bool {
        *self == TaskState::default()
    }
}
