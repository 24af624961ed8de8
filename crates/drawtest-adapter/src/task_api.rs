/*
[INPUT]:  Drawings, answers and task ids from the wizard
[OUTPUT]: Uniform task API results from the real client
[POS]:    Seam between wizard orchestration and transport
[UPDATE]: When adding task operations
*/

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::http::{DrawTestClient, Result};
use crate::types::{CreatedTask, ImageFile, ReportStatusResponse, SurveyAck};

/// Remote task operations the wizard depends on
///
/// Implemented by [`DrawTestClient`]; tests drive the wizard through the scripted
/// double in `mock` (enabled by the `test-util` feature).
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Create a task from the uploaded drawings
    async fn create_task(&self, images: &[ImageFile]) -> Result<CreatedTask>;

    /// Submit flattened answers against a task
    async fn submit_answers(&self, task_id: &str, answers: Map<String, Value>)
    -> Result<SurveyAck>;

    /// Check report generation status
    async fn poll_status(&self, task_id: &str) -> Result<ReportStatusResponse>;
}

#[async_trait]
impl TaskApi for DrawTestClient {
    async fn create_task(&self, images: &[ImageFile]) -> Result<CreatedTask> {
        DrawTestClient::create_task(self, images).await
    }

    async fn submit_answers(
        &self,
        task_id: &str,
        answers: Map<String, Value>,
    ) -> Result<SurveyAck> {
        DrawTestClient::submit_answers(self, task_id, answers).await
    }

    async fn poll_status(&self, task_id: &str) -> Result<ReportStatusResponse> {
        DrawTestClient::poll_status(self, task_id).await
    }
}
