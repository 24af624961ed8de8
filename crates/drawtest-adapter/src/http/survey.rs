/*
[INPUT]:  Task id and flattened questionnaire answers
[OUTPUT]: Service acknowledgement or SubmitError
[POS]:    HTTP layer - survey submission endpoint
[UPDATE]: When the survey payload shape changes
*/

use crate::http::client::{error_detail, status_text};
use crate::http::{DrawTestClient, DrawTestError, Result};
use crate::types::SurveyAck;
use reqwest::Method;
use serde_json::{Map, Value};

impl DrawTestClient {
    /// Submit questionnaire answers for a task
    ///
    /// POST /submit-survey with `{task_id, ...answers}`
    pub async fn submit_answers(
        &self,
        task_id: &str,
        answers: Map<String, Value>,
    ) -> Result<SurveyAck> {
        let payload = survey_payload(task_id, answers);

        let response = self
            .request(Method::POST, &["submit-survey"])
            .json(&payload)
            .send()
            .await
            .map_err(|err| DrawTestError::Submit(format!("Survey submission failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response).await;
            return Err(DrawTestError::Submit(format!(
                "Survey submission failed: {}{}",
                status_text(status),
                detail
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| DrawTestError::Submit(format!("Survey submission failed: {err}")))?;

        if body.is_empty() {
            tracing::info!(task_id, "survey accepted");
            return Ok(SurveyAck(Value::Null));
        }

        let ack = serde_json::from_slice(&body)
            .map_err(|err| DrawTestError::Submit(format!("Survey submission failed: {err}")))?;
        tracing::info!(task_id, "survey accepted");
        Ok(SurveyAck(ack))
    }
}

/// Answers merged with the task id; the task id overrides a colliding answer key.
fn survey_payload(task_id: &str, mut answers: Map<String, Value>) -> Value {
    answers.insert("task_id".to_string(), Value::String(task_id.to_string()));
    Value::Object(answers)
}
