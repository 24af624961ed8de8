/*
[INPUT]:  Nothing
[OUTPUT]: Fixtures shared by unit tests across modules
[POS]:    Test infrastructure - compiled only for tests
[UPDATE]: When fixtures are needed by more than one module
*/

use std::sync::Arc;

use chrono::NaiveDate;
use drawtest_adapter::{
    CreatedTask, DrawingCategory, ImageFile, MockTaskApi, RemoteReportStatus,
    ReportStatusResponse, SurveyAck,
};

use crate::answers::{AnswerValue, Answers, ScaleLevel};
use crate::photos::PhotoSlots;
use crate::questionnaire::Questionnaire;
use crate::store::{Action, TaskState, TaskStore, reduce};
use crate::workflow::Workflow;

pub(crate) fn drawings() -> Vec<ImageFile> {
    vec![
        ImageFile::new("house.png", vec![1u8, 2, 3]),
        ImageFile::new("animal.png", vec![4u8, 5, 6]),
        ImageFile::new("portrait.jpg", vec![7u8, 8, 9]),
    ]
}

pub(crate) fn full_slots() -> PhotoSlots {
    let mut slots = PhotoSlots::new();
    for (category, image) in DrawingCategory::ALL.into_iter().zip(drawings()) {
        slots.assign(category, image);
    }
    slots
}

pub(crate) fn complete_answers() -> Answers {
    let mut answers = Answers::new();
    answers.set("child_name", AnswerValue::Text("Masha".into()));
    answers.set(
        "birth_date",
        AnswerValue::Date(NaiveDate::from_ymd_opt(2018, 3, 5).expect("date")),
    );
    answers.set("gender", AnswerValue::Choice("Girl".into()));
    answers.set("guardian_name", AnswerValue::Text("Anna".into()));
    for id in [
        "joy_frequency",
        "sadness_frequency",
        "anger_without_reason",
        "makes_friends_easily",
        "avoids_playing_with_children",
        "follows_rules",
        "impulse_control_difficulty",
    ] {
        answers.set(id, AnswerValue::Scale(ScaleLevel::new(3).expect("level")));
    }
    answers
}

/// Uploaded and submitted; report generation in progress
pub(crate) fn processing_state() -> TaskState {
    [
        Action::BeginUpload,
        Action::UploadSucceeded {
            task_id: "task-1".into(),
            photos: drawings(),
        },
        Action::BeginSubmit,
        Action::SubmitSucceeded,
    ]
    .iter()
    .fold(TaskState::default(), |state, action| {
        reduce(&state, action).expect("valid fixture transition")
    })
}

/// Drive a store through the given actions
pub(crate) fn store_with(actions: Vec<Action>) -> Arc<TaskStore> {
    let store = Arc::new(TaskStore::new());
    for action in actions {
        store.dispatch(action).expect("valid fixture transition");
    }
    store
}

pub(crate) fn processing_store() -> Arc<TaskStore> {
    store_with(vec![
        Action::BeginUpload,
        Action::UploadSucceeded {
            task_id: "task-1".into(),
            photos: drawings(),
        },
        Action::BeginSubmit,
        Action::SubmitSucceeded,
    ])
}

pub(crate) fn workflow(api: Arc<MockTaskApi>, store: Arc<TaskStore>) -> Arc<Workflow> {
    let questionnaire = Questionnaire::builtin().expect("builtin questionnaire");
    Arc::new(Workflow::new(api, store, Arc::new(questionnaire)))
}

pub(crate) fn created(task_id: &str) -> drawtest_adapter::Result<CreatedTask> {
    Ok(CreatedTask {
        task_id: task_id.to_string(),
    })
}

pub(crate) fn acked() -> drawtest_adapter::Result<SurveyAck> {
    Ok(SurveyAck(serde_json::Value::Null))
}

pub(crate) fn report(
    status: RemoteReportStatus,
    report_url: Option<&str>,
) -> drawtest_adapter::Result<ReportStatusResponse> {
    Ok(ReportStatusResponse {
        status,
        report_url: report_url.map(str::to_string),
    })
}
