use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};

use once_cell::sync::Lazy;
use thiserror::Error;

use super::{AnswerOption, Category, Question};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unable to read catalog: {0}")]
    Read(#[from] std::io::Error),

    #[error("Unable to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog has no questions")]
    Empty,

    #[error("Duplicate question id: {0}")]
    DuplicateQuestion(String),

    #[error("Question {0} has no options")]
    NoOptions(String),

    #[error("Question {question} has duplicate option value {value:?}")]
    DuplicateOption { question: String, value: String },

    #[error("Question {question} is keyed to {value:?}, which is not one of its options")]
    UnknownCorrect { question: String, value: String },
}

/// Ordered, read-only list of questions. Order is presentation order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    questions: Vec<Question>,
}

static BUILTIN: Lazy<Catalog> = Lazy::new(|| Catalog {
    questions: builtin_questions(),
});

impl Catalog {
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        let catalog = Self { questions };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn from_file(file: File) -> Result<Self, CatalogError> {
        Self::from_reader(BufReader::new(file))
    }

    /// Reads a JSON array of questions.
    pub fn from_reader(reader: impl Read) -> Result<Self, CatalogError> {
        let questions: Vec<Question> = serde_json::from_reader(reader)?;
        Self::new(questions)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, position: usize) -> Option<&Question> {
        self.questions.get(position)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.questions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut ids = HashSet::new();
        for question in &self.questions {
            if !ids.insert(question.id.as_str()) {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }
            if question.options.is_empty() {
                return Err(CatalogError::NoOptions(question.id.clone()));
            }
            let mut values = HashSet::new();
            for option in &question.options {
                if !values.insert(option.value.as_str()) {
                    return Err(CatalogError::DuplicateOption {
                        question: question.id.clone(),
                        value: option.value.clone(),
                    });
                }
            }
            if let Some(correct) = &question.correct {
                if !question.has_value(correct) {
                    return Err(CatalogError::UnknownCorrect {
                        question: question.id.clone(),
                        value: correct.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn likert() -> Vec<AnswerOption> {
    vec![
        AnswerOption::new("5", "Strongly Agree"),
        AnswerOption::new("4", "Agree"),
        AnswerOption::new("3", "Neutral"),
        AnswerOption::new("2", "Disagree"),
        AnswerOption::new("1", "Strongly Disagree"),
    ]
}

fn same_label(values: &[&str]) -> Vec<AnswerOption> {
    values.iter().map(|v| AnswerOption::new(*v, *v)).collect()
}

fn builtin_questions() -> Vec<Question> {
    vec![
        // Interest scale
        Question::new(
            "interest_1",
            Category::Psychometric,
            "Interest Scale",
            "I enjoy figuring out how mechanical things work.",
            likert(),
        ),
        Question::new(
            "interest_2",
            Category::Psychometric,
            "Interest Scale",
            "I am fascinated by space exploration and aviation technology.",
            likert(),
        ),
        Question::new(
            "personality_1",
            Category::Psychometric,
            "Personality",
            "I like working in a highly structured environment with clear procedures.",
            likert(),
        ),
        Question::new(
            "motivation_1",
            Category::Psychometric,
            "Motivation",
            "Even when projects become difficult, I stick with them until completion.",
            likert(),
        ),
        Question::new(
            "tech_1",
            Category::Technical,
            "General Aptitude",
            "A car travels 120 km in 2 hours. What is its average speed?",
            same_label(&["60 km/h", "240 km/h", "122 km/h", "58 km/h"]),
        )
        .with_correct("60 km/h"),
        Question::new(
            "tech_2",
            Category::Technical,
            "Physics Knowledge",
            "Which force acts opposite to the direction of thrust in aircraft flight?",
            same_label(&["Drag", "Lift", "Weight", "Pressure"]),
        )
        .with_correct("Drag"),
        Question::new(
            "tech_3",
            Category::Technical,
            "Domain Knowledge",
            "In aerodynamics, what does the term 'angle of attack' refer to?",
            vec![
                AnswerOption::new("angle_wing_airflow", "Angle between wing and relative airflow"),
                AnswerOption::new("angle_fuselage_ground", "Angle between fuselage and ground"),
                AnswerOption::new("angle_thrust_weight", "Angle between thrust and weight vectors"),
                AnswerOption::new("angle_lift_drag", "Angle between lift and drag forces"),
            ],
        )
        .with_correct("angle_wing_airflow"),
        Question::new(
            "wiscar_will",
            Category::Wiscar,
            "Will",
            "I am willing to spend several years studying complex mathematics and physics to master aerospace engineering.",
            likert(),
        ),
        Question::new(
            "wiscar_cognitive",
            Category::Wiscar,
            "Cognitive Readiness",
            "I enjoy solving complex problems that require breaking them down into smaller parts.",
            likert(),
        ),
        Question::new(
            "wiscar_learning",
            Category::Wiscar,
            "Ability to Learn",
            "I actively seek feedback and use it to improve my performance.",
            likert(),
        ),
    ]
}
