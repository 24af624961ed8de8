/*
[INPUT]:  Workflow (store + task API), interval, status source
[OUTPUT]: Cancellable background loop re-checking report status while processing
[POS]:    Orchestration layer - results screen polling
[UPDATE]: When changing polling cadence, stop conditions or cancellation
[UPDATE]: 2026-10-16 Stop on store changes, not only on ticks
*/

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::store::{ReportStatus, StoreSnapshot};
use crate::workflow::Workflow;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Which report status gates the periodic re-check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollStatusSource {
    /// Read the store on every tick
    #[default]
    Latest,
    /// Use the status seen when polling started
    CapturedAtSetup,
}

/// Why a polling loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    Ready,
    Failed,
    Cancelled,
    /// The task was reset under the loop
    Reset,
    /// There was no task to poll
    NoTask,
}

pub struct PollingController {
    workflow: Arc<Workflow>,
    interval: Duration,
    source: PollStatusSource,
}

impl PollingController {
    pub fn new(workflow: Arc<Workflow>, interval: Duration, source: PollStatusSource) -> Self {
        Self {
            workflow,
            interval,
            source,
        }
    }

    /// Start polling: one check now, then one per interval while processing.
    pub fn start(&self) -> PollHandle {
        let token = CancellationToken::new();
        let join = tokio::spawn(poll_loop(
            Arc::clone(&self.workflow),
            self.interval,
            self.source,
            token.clone(),
        ));
        PollHandle {
            token,
            join: Some(join),
        }
    }
}

/// Owner of a running poll loop. Dropping it stops the loop.
#[derive(Debug)]
pub struct PollHandle {
    token: CancellationToken,
    join: Option<JoinHandle<PollExit>>,
}

impl PollHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the loop to end
    pub async fn wait(mut self) -> PollExit {
        match self.join.take() {
            Some(join) => join.await.unwrap_or(PollExit::Cancelled),
            None => PollExit::Cancelled,
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

fn spawn_check(workflow: &Arc<Workflow>) {
    let workflow = Arc::clone(workflow);
    tokio::spawn(async move {
        let outcome = workflow.check_report_status().await;
        debug!(?outcome, "status check finished");
    });
}

/// Why the loop must end for this snapshot, if it must
fn stop_reason(session: Uuid, snapshot: &StoreSnapshot) -> Option<PollExit> {
    if snapshot.session != session {
        info!("task reset; report polling stopped");
        return Some(PollExit::Reset);
    }
    match snapshot.state.report_status {
        ReportStatus::Ready => {
            info!("report ready; polling stopped");
            Some(PollExit::Ready)
        }
        ReportStatus::Failed if !snapshot.state.report_check_in_flight => {
            info!("report failed; polling stopped");
            Some(PollExit::Failed)
        }
        _ => None,
    }
}

async fn poll_loop(
    workflow: Arc<Workflow>,
    period: Duration,
    source: PollStatusSource,
    token: CancellationToken,
) -> PollExit {
    let store = Arc::clone(workflow.store());
    // Subscribe before the first check so its result is observed
    let mut updates = store.subscribe();
    let session = updates.borrow_and_update().session;
    let initial = store.snapshot();

    if initial.task_id.is_none() {
        info!("no task to poll");
        return PollExit::NoTask;
    }
    if initial.report_status == ReportStatus::Ready {
        return PollExit::Ready;
    }

    let captured = initial.report_status;
    info!(interval_ms = period.as_millis() as u64, ?source, "report polling started");

    if !initial.report_check_in_flight {
        spawn_check(&workflow);
    }

    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                info!("report polling cancelled");
                return PollExit::Cancelled;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    return PollExit::Cancelled;
                }
                let snapshot = updates.borrow_and_update().clone();
                if let Some(exit) = stop_reason(session, &snapshot) {
                    return exit;
                }
            }
            _ = ticker.tick() => {
                let snapshot = updates.borrow_and_update().clone();
                if let Some(exit) = stop_reason(session, &snapshot) {
                    return exit;
                }

                let state = snapshot.state;
                let observed = match source {
                    PollStatusSource::Latest => state.report_status,
                    PollStatusSource::CapturedAtSetup => captured,
                };
                if observed != ReportStatus::Processing {
                    continue;
                }
                if state.report_check_in_flight {
                    debug!("status check still in flight; tick skipped");
                    continue;
                }
                spawn_check(&workflow);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Action, TaskStore};
    use crate::test_support::{processing_store, report, workflow};
    use crate::workflow::StepOutcome;
    use drawtest_adapter::{DrawTestError, MockTaskApi, RemoteReportStatus};

    const PERIOD: Duration = Duration::from_secs(5);

    fn controller(api: Arc<MockTaskApi>, store: Arc<TaskStore>, source: PollStatusSource) -> PollingController {
        PollingController::new(workflow(api, store), PERIOD, source)
    }

    fn processing() -> drawtest_adapter::Result<drawtest_adapter::ReportStatusResponse> {
        report(RemoteReportStatus::Processing, None)
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_once_ready() {
        let api = Arc::new(MockTaskApi::new());
        api.push_report(processing()).push_report(report(
            RemoteReportStatus::Completed,
            Some("https://files.example/r.pdf"),
        ));
        let store = processing_store();
        let started = Instant::now();

        let handle = controller(api.clone(), store.clone(), PollStatusSource::Latest).start();
        let exit = handle.wait().await;

        assert_eq!(exit, PollExit::Ready);
        assert_eq!(api.calls().poll_status, 2);
        // second check runs on the first tick; no further tick is waited for
        assert_eq!(started.elapsed(), Duration::from_secs(5));
        assert_eq!(store.snapshot().report_status, ReportStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_two_checks_in_flight() {
        let api = Arc::new(MockTaskApi::new().with_latency(Duration::from_secs(12)));
        api.push_report(processing());
        let store = processing_store();

        let handle = controller(api.clone(), store, PollStatusSource::Latest).start();
        tokio::time::sleep(Duration::from_secs(31)).await;
        handle.cancel();

        let calls = api.calls();
        // checks start at 0s, 15s and 30s; ticks at 5, 10, 20, 25 find one in flight
        assert_eq!(calls.poll_status, 3);
        assert_eq!(calls.max_concurrent_polls, 1);
        assert_eq!(handle.wait().await, PollExit::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_after_failure() {
        let api = Arc::new(MockTaskApi::new());
        api.push_report(Err(DrawTestError::StatusCheck(
            "Status check failed: Bad Gateway".into(),
        )));
        let store = processing_store();

        let exit = controller(api.clone(), store.clone(), PollStatusSource::Latest)
            .start()
            .wait()
            .await;

        assert_eq!(exit, PollExit::Failed);
        assert_eq!(api.calls().poll_status, 1);
        assert_eq!(
            store.snapshot().error.as_deref(),
            Some("Status check failed: Bad Gateway")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_between_ticks_ends_polling_before_retry() {
        let api = Arc::new(MockTaskApi::new());
        api.push_report(Err(DrawTestError::StatusCheck(
            "Status check failed: Bad Gateway".into(),
        )))
        .push_report(processing());
        let store = processing_store();
        let workflow = workflow(api.clone(), store.clone());

        let handle = PollingController::new(workflow.clone(), PERIOD, PollStatusSource::Latest).start();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(store.snapshot().report_status, ReportStatus::Failed);
        assert!(handle.is_finished());

        // Manual retry inside the first interval
        assert_eq!(workflow.check_report_status().await, StepOutcome::Succeeded);
        assert_eq!(store.snapshot().report_status, ReportStatus::Processing);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(api.calls().poll_status, 2);
        assert_eq!(handle.wait().await, PollExit::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_captured_source_also_stops_on_failure() {
        let api = Arc::new(MockTaskApi::new());
        api.push_report(Err(DrawTestError::StatusCheck(
            "Status check failed: Bad Gateway".into(),
        )))
        .push_report(processing());
        let store = processing_store();
        let workflow = workflow(api.clone(), store.clone());

        let handle =
            PollingController::new(workflow.clone(), PERIOD, PollStatusSource::CapturedAtSetup).start();
        tokio::time::sleep(Duration::from_secs(1)).await;
        workflow.check_report_status().await;
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(api.calls().poll_status, 2);
        assert_eq!(handle.wait().await, PollExit::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_task_fails_report() {
        let api = Arc::new(MockTaskApi::new());
        api.push_report(Err(DrawTestError::NotFound("Report not found".into())));
        let store = processing_store();

        let exit = controller(api, store.clone(), PollStatusSource::Latest)
            .start()
            .wait()
            .await;

        assert_eq!(exit, PollExit::Failed);
        assert_eq!(store.snapshot().report_status, ReportStatus::Failed);
        assert_eq!(store.snapshot().error.as_deref(), Some("Report not found"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_loop() {
        let api = Arc::new(MockTaskApi::new());
        api.push_report(processing());
        let store = processing_store();

        let handle = controller(api.clone(), store, PollStatusSource::Latest).start();
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(api.calls().poll_status, 2);

        drop(handle);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(api.calls().poll_status, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_stops_loop() {
        let api = Arc::new(MockTaskApi::new());
        api.push_report(processing());
        let store = processing_store();

        let handle = controller(api.clone(), store.clone(), PollStatusSource::Latest).start();
        tokio::time::sleep(Duration::from_secs(1)).await;
        store.dispatch(Action::Reset).expect("reset");

        assert_eq!(handle.wait().await, PollExit::Reset);
        assert_eq!(api.calls().poll_status, 1);
    }

    #[tokio::test]
    async fn test_no_task_exits_immediately() {
        let api = Arc::new(MockTaskApi::new());
        let exit = controller(api.clone(), Arc::new(TaskStore::new()), PollStatusSource::Latest)
            .start()
            .wait()
            .await;

        assert_eq!(exit, PollExit::NoTask);
        assert_eq!(api.calls().poll_status, 0);
    }

    fn failed_store() -> Arc<TaskStore> {
        let store = processing_store();
        store.dispatch(Action::BeginStatusCheck).expect("begin");
        store
            .dispatch(Action::StatusCheckFailed("Status check failed: Bad Gateway".into()))
            .expect("fail");
        store
    }

    /// Activated after a failure, the first check moves the report back to processing.
    /// Reading the latest status keeps polling; the status captured at activation
    /// (failed) never re-checks.
    #[tokio::test(start_paused = true)]
    async fn test_status_source_divergence_after_failure() {
        let latest_api = Arc::new(MockTaskApi::new());
        latest_api.push_report(processing());
        let latest = controller(latest_api.clone(), failed_store(), PollStatusSource::Latest).start();

        let captured_api = Arc::new(MockTaskApi::new());
        captured_api.push_report(processing());
        let captured =
            controller(captured_api.clone(), failed_store(), PollStatusSource::CapturedAtSetup)
                .start();

        tokio::time::sleep(Duration::from_secs(11)).await;

        assert_eq!(latest_api.calls().poll_status, 3);
        assert_eq!(captured_api.calls().poll_status, 1);

        latest.cancel();
        captured.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sources_agree_while_processing() {
        for source in [PollStatusSource::Latest, PollStatusSource::CapturedAtSetup] {
            let api = Arc::new(MockTaskApi::new());
            api.push_report(processing());
            let handle = controller(api.clone(), processing_store(), source).start();

            tokio::time::sleep(Duration::from_secs(11)).await;
            assert_eq!(api.calls().poll_status, 3, "{source:?}");
            handle.cancel();
        }
    }

    #[tokio::test]
    async fn test_ready_task_is_not_polled() {
        let api = Arc::new(MockTaskApi::new());
        let store = processing_store();
        store.dispatch(Action::BeginStatusCheck).expect("begin");
        store
            .dispatch(Action::StatusCheckSucceeded {
                status: RemoteReportStatus::Completed,
                report_url: Some("https://files.example/r.pdf".into()),
            })
            .expect("ready");

        let exit = controller(api.clone(), store, PollStatusSource::Latest)
            .start()
            .wait()
            .await;

        assert_eq!(exit, PollExit::Ready);
        assert_eq!(api.calls().poll_status, 0);
    }
}
