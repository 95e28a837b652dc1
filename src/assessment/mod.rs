pub mod catalog;
pub mod flow;
pub mod intro;
pub mod results;
pub mod scoring;
pub mod session;

use std::collections::BTreeMap;

/// Question key -> stored value of the selected option.
pub type AnswerMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Psychometric,
    Technical,
    Wiscar,
}

impl Category {
    /// Display asset identifier, resolved by whoever draws the question.
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Psychometric => "brain",
            Category::Technical => "wrench",
            Category::Wiscar => "target",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Psychometric => "Psychometric",
            Category::Technical => "Technical",
            Category::Wiscar => "WISCAR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub category: Category,
    /// Free text, only ever displayed.
    pub subcategory: String,
    pub options: Vec<AnswerOption>,
    /// Keyed correct value, for questions that have one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<String>,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        category: Category,
        subcategory: impl Into<String>,
        text: impl Into<String>,
        options: Vec<AnswerOption>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            category,
            subcategory: subcategory.into(),
            options,
            correct: None,
        }
    }

    pub fn with_correct(mut self, value: impl Into<String>) -> Self {
        self.correct = Some(value.into());
        self
    }

    pub fn is_correct(&self, value: &str) -> Option<bool> {
        self.correct.as_deref().map(|correct| correct == value)
    }

    pub fn option_by_value(&self, value: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.value == value)
    }

    pub fn option_by_label(&self, label: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.label == label)
    }

    pub fn has_value(&self, value: &str) -> bool {
        self.option_by_value(value).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnswerOption {
    pub value: String,
    pub label: String,
}

impl AnswerOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}
