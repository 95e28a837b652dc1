//! Stage coordinator: intro, question flow, results.
//!
//! Every hand-off between stages goes through [`Stage::handle`], so the bot
//! layer only translates chat input into [`Event`]s and renders the stage it
//! gets back.

use thiserror::Error;

use super::catalog::Catalog;
use super::flow::{Advance, FlowController, Retreat};
use super::scoring::{Scorer, Scores};
use super::AnswerMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Stage {
    #[default]
    Intro,
    InProgress {
        flow: FlowController,
    },
    Completed {
        answers: AnswerMap,
        scores: Scores,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartAssessment,
    /// Stored value of the picked option.
    Select(String),
    Next,
    Previous,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Started,
    Answered,
    Moved(usize),
    Completed,
    BackToIntro,
    Restarted,
    /// The stored position no longer fits the catalog.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub stage: Stage,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{event} is not possible during {stage}")]
    NotAllowed {
        event: &'static str,
        stage: &'static str,
    },

    #[error("{0:?} is not an option of the current question")]
    UnknownOption(String),

    #[error("the current question has not been answered yet")]
    Unanswered,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::StartAssessment => "start",
            Event::Select(_) => "select",
            Event::Next => "next",
            Event::Previous => "previous",
            Event::Restart => "restart",
        }
    }
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Intro => "intro",
            Stage::InProgress { .. } => "assessment",
            Stage::Completed { .. } => "results",
        }
    }

    pub fn handle(
        &self,
        event: Event,
        catalog: &Catalog,
        scorer: &Scorer,
    ) -> Result<Transition, SessionError> {
        if let Stage::InProgress { flow } = self {
            if flow.position() >= catalog.len() {
                return Ok(Transition {
                    stage: Stage::Intro,
                    outcome: Outcome::Expired,
                });
            }
        }

        match (self, event) {
            (Stage::Intro, Event::StartAssessment) => Ok(Transition {
                stage: Stage::InProgress {
                    flow: FlowController::new(),
                },
                outcome: Outcome::Started,
            }),

            (Stage::InProgress { flow }, Event::Select(value)) => {
                let question = flow
                    .current_question(catalog)
                    .ok_or_else(|| SessionError::UnknownOption(value.clone()))?;
                if !question.has_value(&value) {
                    return Err(SessionError::UnknownOption(value));
                }
                let mut flow = flow.clone();
                flow.record_answer(catalog, flow.position(), value);
                Ok(Transition {
                    stage: Stage::InProgress { flow },
                    outcome: Outcome::Answered,
                })
            }

            (Stage::InProgress { flow }, Event::Next) => {
                if !flow.can_advance(catalog) {
                    return Err(SessionError::Unanswered);
                }
                let mut flow = flow.clone();
                match flow.advance(catalog) {
                    Advance::Moved(position) => Ok(Transition {
                        stage: Stage::InProgress { flow },
                        outcome: Outcome::Moved(position),
                    }),
                    Advance::Completed(answers) => {
                        let scores = scorer.score(catalog, &answers);
                        Ok(Transition {
                            stage: Stage::Completed { answers, scores },
                            outcome: Outcome::Completed,
                        })
                    }
                }
            }

            (Stage::InProgress { flow }, Event::Previous) => {
                let mut flow = flow.clone();
                match flow.retreat() {
                    Retreat::Moved(position) => Ok(Transition {
                        stage: Stage::InProgress { flow },
                        outcome: Outcome::Moved(position),
                    }),
                    Retreat::ExitToIntro => Ok(Transition {
                        stage: Stage::Intro,
                        outcome: Outcome::BackToIntro,
                    }),
                }
            }

            (Stage::Completed { .. }, Event::Restart) => Ok(Transition {
                stage: Stage::Intro,
                outcome: Outcome::Restarted,
            }),

            (stage, event) => Err(SessionError::NotAllowed {
                event: event.name(),
                stage: stage.name(),
            }),
        }
    }
}
