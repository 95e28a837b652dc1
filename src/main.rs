mod assessment;
mod config;
mod view;

use std::{fs::File, sync::Arc};

use assessment::{
    catalog::Catalog,
    flow::FlowController,
    results,
    scoring::{ScoreSource, Scorer, Scores, SeededSource, ThreadRngSource},
    session::{Event, Outcome, SessionError, Stage, Transition},
    AnswerMap,
};
use config::{Config, StorageKind};
use dotenv::dotenv;
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, InMemStorage, SqliteStorage, Storage},
    prelude::*,
    types::{InputFile, ParseMode},
};

type AssessmentDialogue = Dialogue<Stage, ErasedStorage<Stage>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

type StageStorage = std::sync::Arc<ErasedStorage<Stage>>;

const STALE_SESSION: &str = "The questions have changed since your last visit, let's start over";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if dotenv().is_err() {
        // Plain environment variables are fine too.
        eprintln!("No .env file found, using the process environment");
    }

    pretty_env_logger::init();
    log::info!("Starting assessment bot...");

    let config = Config::from_env()?;
    log::debug!("{:?}", config);

    let catalog = Arc::new(match &config.catalog_path {
        Some(path) => {
            log::info!("Loading question catalog from {}", path.display());
            Catalog::from_file(File::open(path)?)?
        }
        None => Catalog::builtin().clone(),
    });
    log::info!("Catalog loaded: {} questions", catalog.len());

    let source: Box<dyn ScoreSource> = match config.score_seed {
        Some(seed) => Box::new(SeededSource::new(seed)),
        None => Box::new(ThreadRngSource),
    };
    let scorer = Arc::new(Scorer::new(config.scoring, source));
    log::info!("Scoring mode: {:?}", scorer.mode());

    let storage: StageStorage = match &config.storage {
        StorageKind::Memory => InMemStorage::<Stage>::new().erase(),
        StorageKind::Sqlite(path) => {
            log::info!("Opening dialogue storage at {}", path.display());
            SqliteStorage::open(&path.to_string_lossy(), Json)
                .await?
                .erase()
        }
    };

    let bot = Bot::from_env();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<Stage>, Stage>()
            .branch(dptree::case![Stage::Intro].endpoint(intro))
            .branch(dptree::case![Stage::InProgress { flow }].endpoint(in_progress))
            .branch(dptree::case![Stage::Completed { answers, scores }].endpoint(completed)),
    )
    .dependencies(dptree::deps![storage, catalog, scorer])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;

    Ok(())
}

async fn intro(
    bot: Bot,
    dialogue: AssessmentDialogue,
    msg: Message,
    catalog: Arc<Catalog>,
    scorer: Arc<Scorer>,
) -> HandlerResult {
    if msg.text() == Some(view::START_ASSESSMENT) {
        let event = Event::StartAssessment;
        return apply(&bot, &dialogue, &Stage::Intro, event, &catalog, &scorer).await;
    }

    send_intro(&bot, msg.chat.id, &catalog).await
}

async fn in_progress(
    bot: Bot,
    dialogue: AssessmentDialogue,
    flow: FlowController,
    msg: Message,
    catalog: Arc<Catalog>,
    scorer: Arc<Scorer>,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please pick one of the answers on the keyboard")
            .await?;
        return Ok(());
    };

    let event = match text {
        view::PREVIOUS | view::BACK_TO_INTRO => Event::Previous,
        view::NEXT | view::COMPLETE => Event::Next,
        label => Event::Select(
            flow.current_question(&catalog)
                .and_then(|q| q.option_by_label(label))
                .map(|o| o.value.clone())
                // Not a label of this question; the session rejects it.
                .unwrap_or_else(|| label.to_string()),
        ),
    };

    let stage = Stage::InProgress { flow };
    apply(&bot, &dialogue, &stage, event, &catalog, &scorer).await
}

async fn completed(
    bot: Bot,
    dialogue: AssessmentDialogue,
    (answers, scores): (AnswerMap, Scores),
    msg: Message,
    catalog: Arc<Catalog>,
    scorer: Arc<Scorer>,
) -> HandlerResult {
    match msg.text() {
        Some(view::RESTART) => {
            let stage = Stage::Completed { answers, scores };
            apply(&bot, &dialogue, &stage, Event::Restart, &catalog, &scorer).await
        }
        Some(view::DOWNLOAD_REPORT) => {
            let report = results::report(&catalog, &answers, &scores);
            bot.send_document(
                msg.chat.id,
                InputFile::memory(report.into_bytes()).file_name("aerospace-readiness-report.txt"),
            )
            .await?;
            Ok(())
        }
        _ => send_results(&bot, msg.chat.id, &scores).await,
    }
}

/// Runs `event` against `stage`, stores the new stage and shows it.
async fn apply(
    bot: &Bot,
    dialogue: &AssessmentDialogue,
    stage: &Stage,
    event: Event,
    catalog: &Catalog,
    scorer: &Scorer,
) -> HandlerResult {
    let chat_id = dialogue.chat_id();
    let Transition { stage, outcome } = match stage.handle(event, catalog, scorer) {
        Ok(transition) => transition,
        Err(err) => {
            log::warn!("Chat {}: {}", chat_id, err);
            let hint = match err {
                SessionError::Unanswered => "Please choose an answer before moving on",
                SessionError::UnknownOption(_) => "Please pick one of the answers on the keyboard",
                SessionError::NotAllowed { .. } => "That is not available right now",
            };
            bot.send_message(chat_id, hint).await?;
            return Ok(());
        }
    };

    log::debug!("Chat {}: {:?}, now in {}", chat_id, outcome, stage.name());
    match outcome {
        Outcome::Completed => log::info!("Chat {} completed the assessment", chat_id),
        Outcome::Expired => {
            log::warn!("Chat {}: stored session does not fit the catalog", chat_id);
            bot.send_message(chat_id, STALE_SESSION).await?;
        }
        _ => {}
    }

    dialogue.update(stage.clone()).await?;

    match &stage {
        Stage::Intro => send_intro(bot, chat_id, catalog).await,
        Stage::InProgress { flow } => send_question(bot, chat_id, flow, catalog).await,
        Stage::Completed { scores, .. } => send_results(bot, chat_id, scores).await,
    }
}

async fn send_intro(bot: &Bot, chat_id: ChatId, catalog: &Catalog) -> HandlerResult {
    bot.send_message(chat_id, view::intro_text(catalog))
        .parse_mode(ParseMode::Html)
        .reply_markup(view::intro_keyboard())
        .await?;
    Ok(())
}

async fn send_question(
    bot: &Bot,
    chat_id: ChatId,
    flow: &FlowController,
    catalog: &Catalog,
) -> HandlerResult {
    let Some(text) = view::question_text(flow, catalog) else {
        log::error!("Chat {}: no question at position {}", chat_id, flow.position());
        return Ok(());
    };

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(view::question_keyboard(flow, catalog))
        .await?;
    Ok(())
}

async fn send_results(bot: &Bot, chat_id: ChatId, scores: &Scores) -> HandlerResult {
    bot.send_message(chat_id, view::results_text(scores))
        .parse_mode(ParseMode::Html)
        .reply_markup(view::results_keyboard())
        .await?;
    Ok(())
}
