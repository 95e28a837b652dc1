use std::str::FromStr;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::catalog::Catalog;
use super::{AnswerMap, Category};

/// Weights of the composite score, in tenths: psychometric, technical, WISCAR.
const WEIGHTS: (u32, u32, u32) = (3, 4, 3);

// Placeholder draw ranges, as (lowest value, number of values).
const PSYCHOMETRIC_DRAW: (u32, u32) = (65, 30);
const TECHNICAL_DRAW: (u32, u32) = (70, 25);
const WISCAR_DRAW: (u32, u32) = (75, 20);

/// Source of uniform integers for placeholder scoring.
pub trait ScoreSource: Send + Sync {
    /// Returns a value in `0..span`.
    fn draw(&self, span: u32) -> u32;
}

pub struct ThreadRngSource;

impl ScoreSource for ThreadRngSource {
    fn draw(&self, span: u32) -> u32 {
        rand::thread_rng().gen_range(0..span)
    }
}

pub struct SeededSource {
    rng: Mutex<StdRng>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ScoreSource for SeededSource {
    fn draw(&self, span: u32) -> u32 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0..span)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringMode {
    /// Random draws that ignore the answers.
    #[default]
    Placeholder,
    /// Deterministic scores computed from the answers.
    Answers,
}

impl FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" | "random" => Ok(ScoringMode::Placeholder),
            "answers" => Ok(ScoringMode::Answers),
            other => Err(format!("unknown scoring mode {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Scores {
    pub psychometric: u32,
    pub technical: u32,
    pub wiscar: u32,
    pub overall: u32,
}

impl Scores {
    pub fn new(psychometric: u32, technical: u32, wiscar: u32) -> Self {
        Self {
            psychometric,
            technical,
            wiscar,
            overall: composite(psychometric, technical, wiscar),
        }
    }

    /// Parts without a score stay at 0 and drop out of the composite.
    pub fn from_parts(
        psychometric: Option<u32>,
        technical: Option<u32>,
        wiscar: Option<u32>,
    ) -> Self {
        let (p, t, w) = WEIGHTS;
        Self {
            psychometric: psychometric.unwrap_or(0),
            technical: technical.unwrap_or(0),
            wiscar: wiscar.unwrap_or(0),
            overall: weighted(&[(psychometric, p), (technical, t), (wiscar, w)]),
        }
    }

    pub fn recommendation(&self) -> Recommendation {
        Recommendation::for_score(self.overall)
    }
}

/// 30% / 40% / 30%, rounded half up.
pub fn composite(psychometric: u32, technical: u32, wiscar: u32) -> u32 {
    let (p, t, w) = WEIGHTS;
    weighted(&[(Some(psychometric), p), (Some(technical), t), (Some(wiscar), w)])
}

fn weighted(parts: &[(Option<u32>, u32)]) -> u32 {
    let (sum, total) = parts
        .iter()
        .filter_map(|(score, weight)| score.map(|s| (s * weight, *weight)))
        .fold((0, 0), |(sum, total), (s, w)| (sum + s, total + w));
    if total == 0 {
        return 0;
    }
    (2 * sum + total) / (2 * total)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    Excellent,
    Good,
    NeedsWork,
}

impl Recommendation {
    pub fn for_score(score: u32) -> Self {
        if score >= 80 {
            Recommendation::Excellent
        } else if score >= 65 {
            Recommendation::Good
        } else {
            Recommendation::NeedsWork
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Recommendation::Excellent => "Strong alignment - Ready to pursue!",
            Recommendation::Good => "Good fit - Some preparation recommended",
            Recommendation::NeedsWork => "Consider foundational preparation",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Recommendation::Excellent => "check-circle",
            Recommendation::Good => "trending-up",
            Recommendation::NeedsWork => "alert-circle",
        }
    }
}

pub struct Scorer {
    mode: ScoringMode,
    source: Box<dyn ScoreSource>,
}

impl Scorer {
    pub fn new(mode: ScoringMode, source: Box<dyn ScoreSource>) -> Self {
        Self { mode, source }
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    pub fn score(&self, catalog: &Catalog, answers: &AnswerMap) -> Scores {
        match self.mode {
            ScoringMode::Placeholder => self.draw_placeholder(),
            ScoringMode::Answers => score_answers(catalog, answers),
        }
    }

    fn draw_placeholder(&self) -> Scores {
        let draw = |(low, span): (u32, u32)| low + self.source.draw(span);
        Scores::new(
            draw(PSYCHOMETRIC_DRAW),
            draw(TECHNICAL_DRAW),
            draw(WISCAR_DRAW),
        )
    }
}

fn score_answers(catalog: &Catalog, answers: &AnswerMap) -> Scores {
    Scores::from_parts(
        likert_score(catalog, answers, Category::Psychometric),
        technical_score(catalog, answers),
        likert_score(catalog, answers, Category::Wiscar),
    )
}

/// Mean Likert value mapped from 1..=5 onto 0..=100. Missing answers count as 1.
fn likert_score(catalog: &Catalog, answers: &AnswerMap, category: Category) -> Option<u32> {
    let points: Vec<u32> = catalog
        .questions()
        .iter()
        .filter(|q| q.category == category)
        .map(|q| {
            answers
                .get(&q.id)
                .and_then(|v| v.parse::<u32>().ok())
                .map(|v| v.clamp(1, 5) - 1)
                .unwrap_or(0)
        })
        .collect();

    if points.is_empty() {
        return None;
    }
    let n = points.len() as u32;
    let sum: u32 = points.iter().sum();
    Some((sum * 200 + 4 * n) / (8 * n))
}

/// Share of keyed technical questions answered correctly. Unkeyed questions are skipped.
fn technical_score(catalog: &Catalog, answers: &AnswerMap) -> Option<u32> {
    let keyed: Vec<bool> = catalog
        .questions()
        .iter()
        .filter(|q| q.category == Category::Technical && q.correct.is_some())
        .map(|q| {
            answers
                .get(&q.id)
                .and_then(|value| q.is_correct(value))
                .unwrap_or(false)
        })
        .collect();

    if keyed.is_empty() {
        return None;
    }
    let n = keyed.len() as u32;
    let correct = keyed.iter().filter(|c| **c).count() as u32;
    Some((correct * 200 + n) / (2 * n))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Always draws the same offset, clamped to the span.
    pub(crate) struct FixedSource(pub u32);

    impl ScoreSource for FixedSource {
        fn draw(&self, span: u32) -> u32 {
            self.0.min(span - 1)
        }
    }

    fn answer_scorer() -> Scorer {
        Scorer::new(ScoringMode::Answers, Box::new(FixedSource(0)))
    }

    fn answers(pairs: &[(&str, &str)]) -> AnswerMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_composite_weighting() {
        assert_eq!(composite(65, 70, 75), 70);
        assert_eq!(composite(94, 94, 94), 94);
        // 0.3 * 80 + 0.4 * 81 + 0.3 * 80 = 80.4
        assert_eq!(composite(80, 81, 80), 80);
        // 0.3 * 85 + 0.4 * 80 + 0.3 * 80 = 81.5
        assert_eq!(composite(85, 80, 80), 82);
    }

    #[test]
    fn test_placeholder_ignores_answers_and_uses_source() {
        let scorer = Scorer::new(ScoringMode::Placeholder, Box::new(FixedSource(0)));
        let catalog = Catalog::builtin();

        let low = scorer.score(catalog, &AnswerMap::new());
        assert_eq!(low, Scores::new(65, 70, 75));
        assert_eq!(scorer.score(catalog, &answers(&[("tech_2", "Drag")])), low);

        let high = Scorer::new(ScoringMode::Placeholder, Box::new(FixedSource(u32::MAX)))
            .score(catalog, &AnswerMap::new());
        assert_eq!(high, Scores::new(94, 94, 94));
    }

    #[test]
    fn test_placeholder_draws_stay_in_range() {
        let scorer = Scorer::new(ScoringMode::Placeholder, Box::new(ThreadRngSource));
        for _ in 0..200 {
            let scores = scorer.score(Catalog::builtin(), &AnswerMap::new());
            assert!((65..=94).contains(&scores.psychometric));
            assert!((70..=94).contains(&scores.technical));
            assert!((75..=94).contains(&scores.wiscar));
            assert!((70..=94).contains(&scores.overall));
        }
    }

    #[test]
    fn test_seeded_source_is_reproducible() {
        let a = Scorer::new(ScoringMode::Placeholder, Box::new(SeededSource::new(7)));
        let b = Scorer::new(ScoringMode::Placeholder, Box::new(SeededSource::new(7)));
        let catalog = Catalog::builtin();
        for _ in 0..10 {
            assert_eq!(
                a.score(catalog, &AnswerMap::new()),
                b.score(catalog, &AnswerMap::new())
            );
        }
    }

    #[test]
    fn test_answer_scoring_is_deterministic() {
        let scorer = answer_scorer();
        let catalog = Catalog::builtin();
        let perfect = answers(&[
            ("interest_1", "5"),
            ("interest_2", "5"),
            ("personality_1", "5"),
            ("motivation_1", "5"),
            ("tech_1", "60 km/h"),
            ("tech_2", "Drag"),
            ("tech_3", "angle_wing_airflow"),
            ("wiscar_will", "5"),
            ("wiscar_cognitive", "5"),
            ("wiscar_learning", "5"),
        ]);

        let scores = scorer.score(catalog, &perfect);
        assert_eq!(scores, Scores::new(100, 100, 100));
        assert_eq!(scores, scorer.score(catalog, &perfect));
        assert_eq!(scores.recommendation(), Recommendation::Excellent);
    }

    #[test]
    fn test_answer_scoring_partial() {
        let scorer = answer_scorer();
        let scores = scorer.score(
            Catalog::builtin(),
            &answers(&[
                ("interest_1", "3"),
                ("interest_2", "3"),
                ("personality_1", "3"),
                ("motivation_1", "3"),
                ("tech_2", "Drag"),
                ("tech_1", "240 km/h"),
            ]),
        );
        assert_eq!(scores.psychometric, 50);
        assert_eq!(scores.technical, 33);
        assert_eq!(scores.wiscar, 0);
        assert_eq!(scores.overall, 28);
        assert_eq!(scores.recommendation(), Recommendation::NeedsWork);
    }

    #[test]
    fn test_answer_scoring_reads_key_from_loaded_catalog() {
        // Reuses a built-in id with different options and its own key.
        let json = r#"[
            {"id":"tech_1","text":"Unit of thrust?","category":"technical","subcategory":"Units",
             "options":[{"value":"N","label":"Newton"},{"value":"J","label":"Joule"}],"correct":"N"},
            {"id":"tech_x","text":"Unit of work?","category":"technical","subcategory":"Units",
             "options":[{"value":"N","label":"Newton"},{"value":"J","label":"Joule"}],"correct":"J"},
            {"id":"open","text":"Favourite aircraft?","category":"technical","subcategory":"Taste",
             "options":[{"value":"a380","label":"A380"},{"value":"b747","label":"747"}]},
            {"id":"will","text":"I will study hard.","category":"wiscar","subcategory":"Will",
             "options":[{"value":"5","label":"Yes"},{"value":"1","label":"No"}]}
        ]"#;
        let catalog = Catalog::from_reader(json.as_bytes()).unwrap();

        let scores = answer_scorer().score(
            &catalog,
            &answers(&[("tech_1", "N"), ("tech_x", "J"), ("open", "a380"), ("will", "5")]),
        );
        assert_eq!(scores.technical, 100);
        assert_eq!(scores.wiscar, 100);
        // No psychometric questions: the composite is spread over the other two parts.
        assert_eq!(scores.psychometric, 0);
        assert_eq!(scores.overall, 100);
        assert_eq!(scores.recommendation(), Recommendation::Excellent);
    }

    #[test]
    fn test_unkeyed_technical_questions_leave_composite_alone() {
        let json = r#"[
            {"id":"open","text":"Favourite aircraft?","category":"technical","subcategory":"Taste",
             "options":[{"value":"a380","label":"A380"}]},
            {"id":"p1","text":"I like planes.","category":"psychometric","subcategory":"Interest",
             "options":[{"value":"5","label":"Yes"},{"value":"3","label":"Maybe"}]},
            {"id":"w1","text":"I will study hard.","category":"wiscar","subcategory":"Will",
             "options":[{"value":"5","label":"Yes"},{"value":"3","label":"Maybe"}]}
        ]"#;
        let catalog = Catalog::from_reader(json.as_bytes()).unwrap();

        let scores = answer_scorer().score(
            &catalog,
            &answers(&[("open", "a380"), ("p1", "5"), ("w1", "3")]),
        );
        assert_eq!(scores.technical, 0);
        // (0.3 * 100 + 0.3 * 50) / 0.6 = 75
        assert_eq!(scores.overall, 75);
    }

    #[test]
    fn test_composite_of_missing_parts() {
        assert_eq!(Scores::from_parts(Some(80), Some(90), Some(85)), Scores::new(80, 90, 85));
        assert_eq!(Scores::from_parts(None, None, None).overall, 0);
        assert_eq!(Scores::from_parts(None, Some(70), None).overall, 70);
    }

    #[test]
    fn test_recommendation_thresholds() {
        assert_eq!(Recommendation::for_score(80), Recommendation::Excellent);
        assert_eq!(Recommendation::for_score(79), Recommendation::Good);
        assert_eq!(Recommendation::for_score(65), Recommendation::Good);
        assert_eq!(Recommendation::for_score(64), Recommendation::NeedsWork);
    }

    #[test]
    fn test_scoring_mode_parsing() {
        assert_eq!("answers".parse::<ScoringMode>(), Ok(ScoringMode::Answers));
        assert_eq!(" Placeholder ".parse::<ScoringMode>(), Ok(ScoringMode::Placeholder));
        assert!("formula".parse::<ScoringMode>().is_err());
    }
}
