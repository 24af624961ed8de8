/*
[INPUT]:  Drawing-test service response bodies
[OUTPUT]: Typed response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::enums::RemoteReportStatus;

/// Body of `POST /upload`; the task id may be missing on a misbehaving server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub task_id: Option<String>,
}

/// Task created by a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTask {
    pub task_id: String,
}

/// Whatever the survey endpoint answers with; `Null` for empty bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveyAck(pub serde_json::Value);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStatusResponse {
    pub status: RemoteReportStatus,
    #[serde(default)]
    pub report_url: Option<String>,
}
