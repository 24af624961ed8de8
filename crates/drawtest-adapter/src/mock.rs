/*
[INPUT]:  Scripted responses pushed by tests
[OUTPUT]: MockTaskApi replaying them through the TaskApi seam, plus call bookkeeping
[POS]:    Test double - compiled for unit tests or with the test-util feature
[UPDATE]: When adding task operations or changing the mock's bookkeeping
*/

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::http::{DrawTestError, Result};
use crate::task_api::TaskApi;
use crate::types::{CreatedTask, ImageFile, ReportStatusResponse, SurveyAck};

/// Call counters recorded by [`MockTaskApi`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MockCalls {
    pub create_task: usize,
    pub submit_answers: usize,
    pub poll_status: usize,
    /// Highest number of status checks running at the same time
    pub max_concurrent_polls: usize,
}

#[derive(Debug, Default)]
struct MockState {
    uploads: VecDeque<Result<CreatedTask>>,
    submissions: VecDeque<Result<SurveyAck>>,
    reports: VecDeque<Result<ReportStatusResponse>>,
    calls: MockCalls,
    polls_in_flight: usize,
    uploaded_counts: Vec<usize>,
    last_submission: Option<(String, Map<String, Value>)>,
    polled_task_ids: Vec<String>,
}

/// Scripted task API for tests
///
/// Each operation replays its queue in order; the last scripted response repeats
/// once the queue is down to one entry. An empty queue fails the call.
#[derive(Debug, Default)]
pub struct MockTaskApi {
    state: Mutex<MockState>,
    latency: Duration,
}

impl MockTaskApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call, so tests can observe in-flight states
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn push_upload(&self, response: Result<CreatedTask>) -> &Self {
        self.lock().uploads.push_back(response);
        self
    }

    pub fn push_submission(&self, response: Result<SurveyAck>) -> &Self {
        self.lock().submissions.push_back(response);
        self
    }

    pub fn push_report(&self, response: Result<ReportStatusResponse>) -> &Self {
        self.lock().reports.push_back(response);
        self
    }

    pub fn calls(&self) -> MockCalls {
        self.lock().calls
    }

    /// Number of images in each upload, in call order
    pub fn uploaded_counts(&self) -> Vec<usize> {
        self.lock().uploaded_counts.clone()
    }

    pub fn last_submission(&self) -> Option<(String, Map<String, Value>)> {
        self.lock().last_submission.clone()
    }

    pub fn polled_task_ids(&self) -> Vec<String> {
        self.lock().polled_task_ids.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn next_scripted<T: Clone>(
    queue: &mut VecDeque<Result<T>>,
    unscripted: impl FnOnce() -> DrawTestError,
) -> Result<T> {
    if queue.len() > 1 {
        queue.pop_front().unwrap_or_else(|| Err(unscripted()))
    } else {
        queue.front().cloned().unwrap_or_else(|| Err(unscripted()))
    }
}

/// Keeps the in-flight poll count honest even when the caller drops the future.
struct PollInFlight<'a> {
    api: &'a MockTaskApi,
}

impl<'a> PollInFlight<'a> {
    fn enter(api: &'a MockTaskApi) -> Self {
        let mut state = api.lock();
        state.polls_in_flight += 1;
        state.calls.max_concurrent_polls = state.calls.max_concurrent_polls.max(state.polls_in_flight);
        Self { api }
    }
}

impl Drop for PollInFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.api.lock();
        state.polls_in_flight = state.polls_in_flight.saturating_sub(1);
    }
}

#[async_trait]
impl TaskApi for MockTaskApi {
    async fn create_task(&self, images: &[ImageFile]) -> Result<CreatedTask> {
        {
            let mut state = self.lock();
            state.calls.create_task += 1;
            state.uploaded_counts.push(images.len());
        }
        self.delay().await;
        next_scripted(&mut self.lock().uploads, || {
            DrawTestError::Upload("Upload failed: no scripted response".into())
        })
    }

    async fn submit_answers(
        &self,
        task_id: &str,
        answers: Map<String, Value>,
    ) -> Result<SurveyAck> {
        {
            let mut state = self.lock();
            state.calls.submit_answers += 1;
            state.last_submission = Some((task_id.to_string(), answers));
        }
        self.delay().await;
        next_scripted(&mut self.lock().submissions, || {
            DrawTestError::Submit("Survey submission failed: no scripted response".into())
        })
    }

    async fn poll_status(&self, task_id: &str) -> Result<ReportStatusResponse> {
        {
            let mut state = self.lock();
            state.calls.poll_status += 1;
            state.polled_task_ids.push(task_id.to_string());
        }
        let _in_flight = PollInFlight::enter(self);
        self.delay().await;
        next_scripted(&mut self.lock().reports, || {
            DrawTestError::StatusCheck("Status check failed: no scripted response".into())
        })
    }
}
