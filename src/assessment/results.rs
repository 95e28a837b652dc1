//! Static breakdown shown next to the scores, and the downloadable report.
//!
//! None of the tables here depend on the answers.

use super::catalog::Catalog;
use super::scoring::Scores;
use super::AnswerMap;

pub struct WiscarDimension {
    pub dimension: &'static str,
    pub score: u32,
    pub description: &'static str,
}

pub struct CareerMatch {
    pub role: &'static str,
    pub match_percent: u32,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Recommended,
    Future,
}

pub struct LearningStage {
    pub level: &'static str,
    pub status: StageStatus,
    pub courses: &'static [&'static str],
}

pub const WISCAR_BREAKDOWN: [WiscarDimension; 6] = [
    WiscarDimension {
        dimension: "Will",
        score: 85,
        description: "Commitment to long-term goals",
    },
    WiscarDimension {
        dimension: "Interest",
        score: 90,
        description: "Fascination with aerospace",
    },
    WiscarDimension {
        dimension: "Skill",
        score: 75,
        description: "Technical aptitude match",
    },
    WiscarDimension {
        dimension: "Cognitive Readiness",
        score: 80,
        description: "Analytical thinking ability",
    },
    WiscarDimension {
        dimension: "Ability to Learn",
        score: 88,
        description: "Growth mindset & feedback receptivity",
    },
    WiscarDimension {
        dimension: "Real-World Alignment",
        score: 82,
        description: "Lifestyle & career values match",
    },
];

pub const CAREER_MATCHES: [CareerMatch; 4] = [
    CareerMatch {
        role: "Aerospace Engineer",
        match_percent: 92,
        description: "Design aircraft/spacecraft systems",
    },
    CareerMatch {
        role: "Avionics Engineer",
        match_percent: 88,
        description: "Embedded control & flight systems",
    },
    CareerMatch {
        role: "Simulation Engineer",
        match_percent: 85,
        description: "Modeling & computational analysis",
    },
    CareerMatch {
        role: "Propulsion Systems Analyst",
        match_percent: 82,
        description: "Engine systems & fuel efficiency",
    },
];

pub const LEARNING_PATH: [LearningStage; 3] = [
    LearningStage {
        level: "Foundation",
        status: StageStatus::Recommended,
        courses: &["Physics & Mathematics", "Programming Basics", "Intro to Aerospace"],
    },
    LearningStage {
        level: "Intermediate",
        status: StageStatus::Future,
        courses: &["Aerodynamics", "CAD Design", "Control Systems"],
    },
    LearningStage {
        level: "Advanced",
        status: StageStatus::Future,
        courses: &["CFD Modeling", "Avionics", "Team Projects"],
    },
];

/// Plain-text report of one finished session.
pub fn report(catalog: &Catalog, answers: &AnswerMap, scores: &Scores) -> String {
    let mut doc = String::from(
        "Aerospace Readiness Assessment Report\n\
         =====================================\n\n",
    );
    doc.push_str(&format!(
        "Overall confidence score: {}%\nRecommendation: {}\n\n",
        scores.overall,
        scores.recommendation().text()
    ));
    doc.push_str(&format!(
        "Psychometric fit (30%): {}%\n\
         Technical aptitude (40%): {}%\n\
         WISCAR alignment (30%): {}%\n\n",
        scores.psychometric, scores.technical, scores.wiscar
    ));

    doc.push_str("Answers:\n");
    for (i, question) in catalog.questions().iter().enumerate() {
        let answer = answers
            .get(&question.id)
            .map(|value| {
                question
                    .option_by_value(value)
                    .map(|o| o.label.clone())
                    .unwrap_or_else(|| value.clone())
            })
            .unwrap_or_else(|| "(not answered)".to_string());
        doc.push_str(&format!(
            "  {}. [{} / {}] {}\n     -> {}\n",
            i + 1,
            question.category.title(),
            question.subcategory,
            question.text,
            answer
        ));
    }

    doc.push_str("\nWISCAR framework analysis:\n");
    for item in &WISCAR_BREAKDOWN {
        doc.push_str(&format!("  {}: {}% ({})\n", item.dimension, item.score, item.description));
    }

    doc.push_str("\nTop career matches:\n");
    for career in &CAREER_MATCHES {
        doc.push_str(&format!(
            "  {} - {}% ({})\n",
            career.role, career.match_percent, career.description
        ));
    }

    doc.push_str("\nRecommended learning path:\n");
    for (i, stage) in LEARNING_PATH.iter().enumerate() {
        let marker = match stage.status {
            StageStatus::Recommended => " (start here)",
            StageStatus::Future => "",
        };
        doc.push_str(&format!(
            "  {}. {}{}: {}\n",
            i + 1,
            stage.level,
            marker,
            stage.courses.join(", ")
        ));
    }
    doc
}
