use teloxide::types::{KeyboardButton, KeyboardMarkup};
use teloxide::utils::html;

use crate::assessment::catalog::Catalog;
use crate::assessment::flow::FlowController;
use crate::assessment::intro;
use crate::assessment::results::{StageStatus, CAREER_MATCHES, LEARNING_PATH, WISCAR_BREAKDOWN};
use crate::assessment::scoring::Scores;

pub const START_ASSESSMENT: &str = "Start Assessment";
pub const PREVIOUS: &str = "◀️ Previous";
pub const BACK_TO_INTRO: &str = "◀️ Back to Intro";
pub const NEXT: &str = "Next ▶️";
pub const COMPLETE: &str = "Complete Assessment ▶️";
pub const RESTART: &str = "🔄 Take Assessment Again";
pub const DOWNLOAD_REPORT: &str = "📄 Download Detailed Report";

pub fn icon_emoji(icon: &str) -> &'static str {
    match icon {
        "brain" => "🧠",
        "wrench" => "🔧",
        "target" => "🎯",
        "rocket" => "🚀",
        "satellite" => "🛰",
        "plane" => "✈️",
        "users" => "👥",
        "check-circle" => "✅",
        "trending-up" => "📈",
        "alert-circle" => "⚠️",
        _ => "•",
    }
}

pub fn intro_text(catalog: &Catalog) -> String {
    let careers = intro::CAREERS
        .iter()
        .map(|(title, icon)| format!("{} {}", icon_emoji(icon), html::escape(title)))
        .collect::<Vec<_>>()
        .join("\n");
    let traits = intro::TRAITS
        .iter()
        .map(|t| format!("• {}", html::escape(t)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "🚀 <b>{}</b>\n\n{}\n\n<b>What is Aerospace Engineering?</b>\n{}\n\n\
         <b>Assessment Overview</b>\nTotal duration: {}\nSections: {} main areas\nQuestions: {}\n\n\
         <b>Typical Career Paths</b>\n{}\n\n<b>Traits That Lead to Success</b>\n{}",
        html::escape(intro::TITLE),
        html::escape(intro::SUMMARY),
        html::escape(intro::FIELD_DESCRIPTION),
        intro::DURATION,
        intro::section_count(catalog),
        catalog.len(),
        careers,
        traits,
    )
}

pub fn intro_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(START_ASSESSMENT)]]).resize_keyboard(true)
}

/// Question card for the current position. `None` past the end of the catalog.
pub fn question_text(flow: &FlowController, catalog: &Catalog) -> Option<String> {
    let question = flow.current_question(catalog)?;
    let mut text = format!(
        "<b>{} Assessment</b> · Question {} of {} ({:.0}%)\n\n{} <i>{}</i>\n<b>{}</b>",
        question.category.title(),
        flow.position() + 1,
        catalog.len(),
        flow.progress_percent(catalog),
        icon_emoji(question.category.icon()),
        html::escape(&question.subcategory),
        html::escape(&question.text),
    );
    if let Some(label) = flow
        .current_answer(catalog)
        .and_then(|value| question.option_by_value(value))
        .map(|o| &o.label)
    {
        text.push_str(&format!("\n\nYour answer: {}", html::escape(label)));
    }
    text.push_str(&format!("\n\n<i>Answered {} of {}</i>", flow.answers().len(), catalog.len()));
    Some(text)
}

/// One row per option, then navigation. Next only shows up once the question is answered.
pub fn question_keyboard(flow: &FlowController, catalog: &Catalog) -> KeyboardMarkup {
    let mut rows: Vec<Vec<KeyboardButton>> = flow
        .current_question(catalog)
        .map(|q| {
            q.options
                .iter()
                .map(|o| vec![KeyboardButton::new(o.label.clone())])
                .collect()
        })
        .unwrap_or_default();

    let mut navigation = vec![KeyboardButton::new(if flow.is_first() {
        BACK_TO_INTRO
    } else {
        PREVIOUS
    })];
    if flow.can_advance(catalog) {
        navigation.push(KeyboardButton::new(if flow.is_last(catalog) {
            COMPLETE
        } else {
            NEXT
        }));
    }
    rows.push(navigation);

    KeyboardMarkup::new(rows).resize_keyboard(true)
}

pub fn results_text(scores: &Scores) -> String {
    let recommendation = scores.recommendation();

    let wiscar = WISCAR_BREAKDOWN
        .iter()
        .map(|d| {
            format!(
                "• {}: {}% <i>({})</i>",
                d.dimension,
                d.score,
                html::escape(d.description)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let careers = CAREER_MATCHES
        .iter()
        .map(|c| format!("• {} ({}%): {}", c.role, c.match_percent, html::escape(c.description)))
        .collect::<Vec<_>>()
        .join("\n");
    let path = LEARNING_PATH
        .iter()
        .enumerate()
        .map(|(i, stage)| {
            let marker = match stage.status {
                StageStatus::Recommended => " ⭐ Start Here",
                StageStatus::Future => "",
            };
            format!(
                "{}. <b>{}</b>{}\n   {}",
                i + 1,
                stage.level,
                marker,
                html::escape(&stage.courses.join(", "))
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "🚀 <b>Your Aerospace Readiness Assessment</b>\n{} {}\n\n\
         <b>Overall Confidence Score: {}%</b>\n\
         This composite score reflects your psychological fit (30%), technical aptitude (40%), \
         and WISCAR framework alignment (30%) for aerospace engineering.\n\n\
         <b>Assessment Breakdown</b>\n🧠 Psychometric Fit: {}%\n\
         🔧 Technical Aptitude: {}%\n🎯 WISCAR Alignment: {}%\n\n\
         <b>WISCAR Framework Analysis</b>\n{}\n\n\
         <b>Top Career Matches</b>\n{}\n\n\
         <b>Recommended Learning Path</b>\n{}",
        icon_emoji(recommendation.icon()),
        recommendation.text(),
        scores.overall,
        scores.psychometric,
        scores.technical,
        scores.wiscar,
        wiscar,
        careers,
        path,
    )
}

pub fn results_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(RESTART)],
        vec![KeyboardButton::new(DOWNLOAD_REPORT)],
    ])
    .resize_keyboard(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::flow::Advance;

    fn labels(keyboard: &KeyboardMarkup) -> Vec<String> {
        keyboard
            .keyboard
            .iter()
            .flatten()
            .map(|b| b.text.clone())
            .collect()
    }

    #[test]
    fn test_intro_escapes_html() {
        let text = intro_text(Catalog::builtin());
        assert!(text.contains("R&amp;D Engineer"));
        assert!(text.contains("Questions: 10"));
        assert!(text.contains("Sections: 3 main areas"));
    }

    #[test]
    fn test_first_question_keyboard_without_answer() {
        let catalog = Catalog::builtin();
        let flow = FlowController::new();
        let buttons = labels(&question_keyboard(&flow, catalog));
        assert_eq!(buttons.len(), 6);
        assert_eq!(buttons[0], "Strongly Agree");
        assert_eq!(buttons.last().map(String::as_str), Some(BACK_TO_INTRO));
        assert!(!buttons.iter().any(|b| b == NEXT));
    }

    #[test]
    fn test_answered_question_offers_next() {
        let catalog = Catalog::builtin();
        let mut flow = FlowController::new();
        flow.record_answer(catalog, 0, "4");
        let buttons = labels(&question_keyboard(&flow, catalog));
        assert!(buttons.iter().any(|b| b == NEXT));

        let text = question_text(&flow, catalog).unwrap();
        assert!(text.contains("Question 1 of 10"));
        assert!(text.contains("Your answer: Agree"));
        assert!(text.contains("Answered 1 of 10"));
        assert!(text.contains("🧠"));
    }

    #[test]
    fn test_last_question_offers_completion() {
        let catalog = Catalog::builtin();
        let mut flow = FlowController::new();
        for position in 0..catalog.len() - 1 {
            let value = catalog.get(position).unwrap().options[0].value.clone();
            flow.record_answer(catalog, position, value);
            assert!(matches!(flow.advance(catalog), Advance::Moved(_)));
        }
        let last = catalog.get(flow.position()).unwrap();
        flow.record_answer(catalog, flow.position(), last.options[0].value.clone());
        let buttons = labels(&question_keyboard(&flow, catalog));
        assert!(buttons.iter().any(|b| b == COMPLETE));
        assert!(buttons.iter().any(|b| b == PREVIOUS));

        let text = question_text(&flow, catalog).unwrap();
        assert!(text.contains("Answered 10 of 10"));
    }

    #[test]
    fn test_results_text_shows_scores() {
        let text = results_text(&Scores::new(70, 72, 80));
        assert!(text.contains("Overall Confidence Score: 74%"));
        assert!(text.contains("Good fit - Some preparation recommended"));
        assert!(text.contains("Foundation</b> ⭐ Start Here"));
        assert!(text.contains("Physics &amp; Mathematics"));
    }
}
