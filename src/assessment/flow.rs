use super::catalog::Catalog;
use super::{AnswerMap, Question};

/// Walks a catalog once, front to back, collecting answers.
///
/// The controller only keeps the position and the answers; the catalog is
/// passed in on every call so the state stays small enough to live in
/// dialogue storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FlowController {
    position: usize,
    answers: AnswerMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    /// The last question was passed; carries the answers as recorded so far.
    Completed(AnswerMap),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    Moved(usize),
    ExitToIntro,
}

impl FlowController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn current_question<'c>(&self, catalog: &'c Catalog) -> Option<&'c Question> {
        catalog.get(self.position)
    }

    pub fn current_answer(&self, catalog: &Catalog) -> Option<&str> {
        let question = self.current_question(catalog)?;
        self.answers.get(&question.id).map(String::as_str)
    }

    /// Overwrites whatever was recorded for the question at `position`.
    /// Callers only offer the question's own option values.
    pub fn record_answer(&mut self, catalog: &Catalog, position: usize, value: impl Into<String>) {
        if let Some(question) = catalog.get(position) {
            self.answers.insert(question.id.clone(), value.into());
        }
    }

    pub fn can_advance(&self, catalog: &Catalog) -> bool {
        self.current_answer(catalog).is_some()
    }

    pub fn is_first(&self) -> bool {
        self.position == 0
    }

    pub fn is_last(&self, catalog: &Catalog) -> bool {
        self.position + 1 >= catalog.len()
    }

    pub fn advance(&mut self, catalog: &Catalog) -> Advance {
        if self.is_last(catalog) {
            return Advance::Completed(self.answers.clone());
        }
        self.position += 1;
        Advance::Moved(self.position)
    }

    pub fn retreat(&mut self) -> Retreat {
        if self.position == 0 {
            return Retreat::ExitToIntro;
        }
        self.position -= 1;
        Retreat::Moved(self.position)
    }

    pub fn progress_percent(&self, catalog: &Catalog) -> f64 {
        if catalog.is_empty() {
            return 0.0;
        }
        (self.position + 1) as f64 / catalog.len() as f64 * 100.0
    }
}
