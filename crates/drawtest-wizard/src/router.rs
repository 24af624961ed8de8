/*
[INPUT]:  Screen completion signals and the current TaskState
[OUTPUT]: Current wizard screen, or the reason a transition was refused
[POS]:    Navigation layer - welcome/upload/questions/results state machine
[UPDATE]: When adding screens or changing their gates
*/

use std::fmt;

use thiserror::Error;

use crate::store::{Action, PhaseStatus, TaskState, TaskStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Screen {
    #[default]
    Welcome,
    Upload,
    Questions,
    Results,
}

impl Screen {
    pub const ALL: [Screen; 4] = [
        Screen::Welcome,
        Screen::Upload,
        Screen::Questions,
        Screen::Results,
    ];

    pub fn index(self) -> usize {
        match self {
            Screen::Welcome => 0,
            Screen::Upload => 1,
            Screen::Questions => 2,
            Screen::Results => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::Welcome => "Welcome",
            Screen::Upload => "Drawings",
            Screen::Questions => "Questionnaire",
            Screen::Results => "Results",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("cannot {signal} from the {current} screen")]
    WrongScreen {
        signal: &'static str,
        current: Screen,
    },
    #[error("drawings have not been uploaded yet (upload is {0})")]
    UploadIncomplete(PhaseStatus),
    #[error("answers have not been submitted yet (submit is {0})")]
    SubmitIncomplete(PhaseStatus),
}

/// Holds only the current screen; every gate reads the task state it is given.
#[derive(Debug, Clone, Default)]
pub struct ScreenRouter {
    current: Screen,
}

impl ScreenRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    fn expect(&self, screen: Screen, signal: &'static str) -> Result<(), RouteError> {
        if self.current != screen {
            return Err(RouteError::WrongScreen {
                signal,
                current: self.current,
            });
        }
        Ok(())
    }

    pub fn start(&mut self) -> Result<Screen, RouteError> {
        self.expect(Screen::Welcome, "start")?;
        self.current = Screen::Upload;
        Ok(self.current)
    }

    /// The upload screen signals completion
    pub fn photos_uploaded(&mut self, state: &TaskState) -> Result<Screen, RouteError> {
        self.expect(Screen::Upload, "continue to questions")?;
        if state.upload_status != PhaseStatus::Succeeded {
            return Err(RouteError::UploadIncomplete(state.upload_status));
        }
        self.current = Screen::Questions;
        Ok(self.current)
    }

    /// The questions screen signals completion
    pub fn questions_completed(&mut self, state: &TaskState) -> Result<Screen, RouteError> {
        self.expect(Screen::Questions, "continue to results")?;
        if state.submit_status != PhaseStatus::Succeeded {
            return Err(RouteError::SubmitIncomplete(state.submit_status));
        }
        self.current = Screen::Results;
        Ok(self.current)
    }

    /// Back to the start with a fresh task
    pub fn restart(&mut self, store: &TaskStore) -> Result<Screen, RouteError> {
        self.expect(Screen::Results, "restart")?;
        if let Err(err) = store.dispatch(Action::Reset) {
            tracing::warn!(error = %err, "reset rejected");
        }
        self.current = Screen::Welcome;
        Ok(self.current)
    }
}
