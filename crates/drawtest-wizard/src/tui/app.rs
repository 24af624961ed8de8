/*
[INPUT]:  Workflow, download client, settings, store snapshots, background step results
[OUTPUT]: AppState driving screens, forms, the report poller and status notifications
[POS]:    TUI app state - glue between key handling and the wizard library
[UPDATE]: When adding wizard actions or changing how step results surface
*/

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use drawtest_adapter::{DrawTestClient, DrawingCategory};
use tokio::sync::mpsc;
use tracing::{info, warn};

use drawtest_wizard::photos::load_image;
use drawtest_wizard::report::{save_report, write_summary};
use drawtest_wizard::store::{PhaseStatus, ReportStatus};
use drawtest_wizard::{
    PollHandle, PollStatusSource, PollingController, Screen, ScreenRouter, StepOutcome, TaskState,
    Workflow,
};

use super::forms::{QuestionsForm, UploadForm};
use super::runtime::{LogBufferHandle, UiEvent};

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub poll_interval: Duration,
    pub poll_source: PollStatusSource,
    pub output_dir: PathBuf,
}

/// Result of work spawned off the UI loop
#[derive(Debug)]
pub(super) enum Background {
    Upload(StepOutcome),
    Submit(StepOutcome),
    StatusCheck(StepOutcome),
    Saved {
        what: &'static str,
        result: Result<PathBuf, String>,
    },
}

pub(super) struct AppState {
    pub(super) workflow: Arc<Workflow>,
    downloader: Arc<DrawTestClient>,
    settings: AppSettings,
    pub(super) router: ScreenRouter,
    pub(super) upload: UploadForm,
    pub(super) questions: QuestionsForm,
    poller: Option<PollHandle>,
    pub(super) task: TaskState,
    pub(super) log_buffer: LogBufferHandle,
    pub(super) status_message: String,
    events: mpsc::UnboundedSender<UiEvent>,
}

impl AppState {
    pub(super) fn new(
        workflow: Arc<Workflow>,
        downloader: Arc<DrawTestClient>,
        settings: AppSettings,
        log_buffer: LogBufferHandle,
        events: mpsc::UnboundedSender<UiEvent>,
    ) -> Self {
        let questions = QuestionsForm::new(workflow.questionnaire());
        let task = workflow.store().snapshot();
        Self {
            workflow,
            downloader,
            settings,
            router: ScreenRouter::new(),
            upload: UploadForm::new(),
            questions,
            poller: None,
            task,
            log_buffer,
            status_message: "Ready".to_string(),
            events,
        }
    }

    pub(super) fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|poller| !poller.is_finished())
    }

    pub(super) fn on_tick(&mut self) {
        if self.poller.as_ref().is_some_and(PollHandle::is_finished) {
            self.poller = None;
        }
    }

    /// Pull the latest store snapshot and announce report transitions
    pub(super) fn sync_task(&mut self) {
        let previous = self.task.report_status;
        self.task = self.workflow.store().snapshot();
        if self.router.current() != Screen::Results || previous == self.task.report_status {
            return;
        }
        match self.task.report_status {
            ReportStatus::Ready => {
                self.status_message = "Report ready: press [d] to download".to_string();
            }
            ReportStatus::Failed => {
                // Retries are single checks; the interval never resumes
                if let Some(poller) = self.poller.take() {
                    poller.cancel();
                }
                let error = self.task.error.clone().unwrap_or_default();
                self.status_message = format!("Report check failed: {error}");
            }
            ReportStatus::Idle | ReportStatus::Processing => {}
        }
    }

    fn spawn<F>(&self, work: F)
    where
        F: Future<Output = Background> + Send + 'static,
    {
        let events = self.events.clone();
        tokio::spawn(async move {
            let _ = events.send(UiEvent::Background(work.await));
        });
    }

    pub(super) fn start(&mut self) {
        match self.router.start() {
            Ok(_) => self.status_message = "Pick the three drawings".to_string(),
            Err(err) => self.status_message = err.to_string(),
        }
    }

    pub(super) async fn load_slot(&mut self, category: DrawingCategory, path: &Path) {
        match load_image(path).await {
            Ok(image) => {
                self.status_message = format!("{}: {}", category.label(), image.file_name);
                self.upload.assign(category, image);
            }
            Err(err) => {
                warn!(%category, error = %err, "drawing not loaded");
                self.status_message = err.to_string();
            }
        }
    }

    pub(super) fn clear_slot(&mut self, category: DrawingCategory) {
        self.upload.remove(category);
        self.status_message = format!("{}: cleared", category.label());
    }

    pub(super) fn begin_upload(&mut self) {
        match self.task.upload_status {
            PhaseStatus::Succeeded => {
                self.advance_from_upload();
                return;
            }
            PhaseStatus::Loading => {
                self.status_message = "Upload in progress".to_string();
                return;
            }
            PhaseStatus::Idle | PhaseStatus::Failed => {}
        }
        if !self.upload.slots().is_complete() {
            self.status_message = format!(
                "Select all three drawings first ({} of 3 selected)",
                self.upload.slots().filled_count()
            );
            return;
        }

        self.status_message = "Uploading drawings...".to_string();
        let workflow = Arc::clone(&self.workflow);
        let slots = self.upload.slots().clone();
        self.spawn(async move { Background::Upload(workflow.upload_photos(&slots).await) });
    }

    fn advance_from_upload(&mut self) {
        match self.router.photos_uploaded(&self.task) {
            Ok(_) => self.status_message = "Drawings uploaded. Answer the questions".to_string(),
            Err(err) => self.status_message = err.to_string(),
        }
    }

    pub(super) fn begin_submit(&mut self) {
        if self.task.submit_status == PhaseStatus::Loading {
            self.status_message = "Submission in progress".to_string();
            return;
        }
        let answers = match self.questions.collect() {
            Ok(answers) => answers,
            Err(issue) => {
                self.status_message = issue.to_string();
                return;
            }
        };

        self.status_message = "Submitting answers...".to_string();
        let workflow = Arc::clone(&self.workflow);
        self.spawn(async move { Background::Submit(workflow.submit_answers(answers).await) });
    }

    fn enter_results(&mut self) {
        let controller = PollingController::new(
            Arc::clone(&self.workflow),
            self.settings.poll_interval,
            self.settings.poll_source,
        );
        self.poller = Some(controller.start());
        self.status_message = "Generating report...".to_string();
    }

    /// Manual single-shot status check
    pub(super) fn retry_status_check(&mut self) {
        let retryable = match self.task.report_status {
            ReportStatus::Failed => true,
            ReportStatus::Processing => !self.is_polling(),
            ReportStatus::Idle | ReportStatus::Ready => false,
        };
        if !retryable || self.task.report_check_in_flight {
            self.status_message = "Nothing to retry".to_string();
            return;
        }

        self.status_message = "Checking report status...".to_string();
        let workflow = Arc::clone(&self.workflow);
        self.spawn(async move { Background::StatusCheck(workflow.check_report_status().await) });
    }

    pub(super) fn download_report(&mut self) {
        let Some(url) = self.task.report_url.clone() else {
            self.status_message = "The report is not ready yet".to_string();
            return;
        };

        self.status_message = "Downloading report...".to_string();
        let client = Arc::clone(&self.downloader);
        let dir = self.settings.output_dir.clone();
        let answers = self.task.answers.clone();
        self.spawn(async move {
            let result = match client.fetch_report(&url).await {
                Ok(bytes) => save_report(&dir, &answers, Local::now().date_naive(), &bytes)
                    .await
                    .map_err(|err| format!("Download failed: {err}")),
                Err(err) => Err(err.message().to_string()),
            };
            Background::Saved {
                what: "Report",
                result,
            }
        });
    }

    pub(super) fn export_summary(&mut self) {
        if self.task.answers.is_empty() {
            self.status_message = "No answers to export".to_string();
            return;
        }

        let dir = self.settings.output_dir.clone();
        let answers = self.task.answers.clone();
        self.spawn(async move {
            let result = write_summary(&dir, &answers, Local::now().date_naive())
                .await
                .map_err(|err| format!("Export failed: {err}"));
            Background::Saved {
                what: "Summary",
                result,
            }
        });
    }

    pub(super) fn restart(&mut self) {
        match self.router.restart(self.workflow.store()) {
            Ok(_) => {
                self.poller = None;
                self.upload.reset();
                self.questions.reset(self.workflow.questionnaire());
                self.task = self.workflow.store().snapshot();
                self.status_message = "Started over".to_string();
                info!("wizard restarted from results");
            }
            Err(err) => self.status_message = err.to_string(),
        }
    }

    pub(super) fn on_background(&mut self, result: Background) {
        self.sync_task();
        match result {
            Background::Upload(StepOutcome::Succeeded) => self.advance_from_upload(),
            Background::Submit(StepOutcome::Succeeded) => {
                match self.router.questions_completed(&self.task) {
                    Ok(_) => self.enter_results(),
                    Err(err) => self.status_message = err.to_string(),
                }
            }
            Background::StatusCheck(StepOutcome::Succeeded) => {
                if self.task.report_status == ReportStatus::Processing {
                    self.status_message = "Report is still being generated".to_string();
                }
            }
            Background::Submit(StepOutcome::Incomplete(issues)) => {
                let details = issues
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                self.status_message = format!("Please complete the questionnaire: {details}");
                if let Some(issue) = issues.first() {
                    self.questions.focus_question(issue.question_id());
                }
            }
            Background::Upload(outcome)
            | Background::Submit(outcome)
            | Background::StatusCheck(outcome) => match outcome {
                StepOutcome::Failed(message) | StepOutcome::Rejected(message) => {
                    self.status_message = message;
                }
                StepOutcome::Incomplete(issues) => {
                    self.status_message = format!("{} answers need attention", issues.len());
                }
                StepOutcome::Stale => {}
                StepOutcome::Succeeded => {}
            },
            Background::Saved { what, result } => match result {
                Ok(path) => self.status_message = format!("{what} saved to {}", path.display()),
                Err(message) => self.status_message = message,
            },
        }
    }

    pub(super) fn shutdown(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.cancel();
        }
    }
}
