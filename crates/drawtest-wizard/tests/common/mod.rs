/*
[INPUT]:  Mock server and fixture requirements
[OUTPUT]: Shared helpers for wizard integration tests
[POS]:    Test infrastructure - shared across integration test files
[UPDATE]: When adding new test patterns or fixtures
*/

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use drawtest_adapter::{ClientConfig, DrawTestClient, DrawingCategory, ImageFile};
use drawtest_wizard::{
    AnswerValue, Answers, PhotoSlots, Questionnaire, ScaleLevel, TaskStore, Workflow,
};
use wiremock::MockServer;

pub fn client_for(server: &MockServer) -> Arc<DrawTestClient> {
    let config = ClientConfig {
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
    };
    Arc::new(DrawTestClient::with_config_and_base_url(config, &server.uri()).expect("client init"))
}

/// Workflow over the real HTTP client and the built-in questionnaire
pub fn workflow_for(client: Arc<DrawTestClient>) -> Arc<Workflow> {
    let questionnaire = Arc::new(Questionnaire::builtin().expect("built-in questionnaire"));
    Arc::new(Workflow::new(client, Arc::new(TaskStore::new()), questionnaire))
}

pub fn full_slots() -> PhotoSlots {
    let mut slots = PhotoSlots::new();
    let names = ["house.png", "animal.png", "portrait.jpg"];
    for (category, name) in DrawingCategory::ALL.into_iter().zip(names) {
        slots.assign(category, ImageFile::new(name, vec![0x89, b'P', b'N', b'G']));
    }
    slots
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).expect("date")
}

pub fn answers() -> Answers {
    let mut answers = Answers::new();
    answers.set("child_name", AnswerValue::Text("Masha".into()));
    answers.set(
        "birth_date",
        AnswerValue::Date(NaiveDate::from_ymd_opt(2019, 4, 1).expect("date")),
    );
    answers.set("gender", AnswerValue::Choice("Girl".into()));
    answers.set("guardian_name", AnswerValue::Text("Anna".into()));
    for (id, level) in [
        ("joy_frequency", 5),
        ("sadness_frequency", 2),
        ("anger_without_reason", 1),
        ("makes_friends_easily", 4),
        ("avoids_playing_with_children", 2),
        ("follows_rules", 3),
        ("impulse_control_difficulty", 2),
    ] {
        answers.set(id, AnswerValue::Scale(ScaleLevel::new(level).expect("level")));
    }
    answers
}
