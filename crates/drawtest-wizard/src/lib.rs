/*
[INPUT]:  Public API exports for the drawtest-wizard crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod answers;
pub mod config;
pub mod photos;
pub mod polling;
pub mod questionnaire;
pub mod report;
pub mod router;
pub mod store;
pub mod workflow;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use answers::{AnswerValue, Answers, ScaleLevel};
pub use config::WizardConfig;
pub use photos::PhotoSlots;
pub use polling::{PollExit, PollHandle, PollStatusSource, PollingController};
pub use questionnaire::Questionnaire;
pub use router::{Screen, ScreenRouter};
pub use store::{TaskState, TaskStore};
pub use workflow::{StepOutcome, Workflow};
