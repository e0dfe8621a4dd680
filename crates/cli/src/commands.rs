//! One handler per subcommand.
//!
//! Handlers print their view to stdout and report failures inline. The
//! returned [`ExitCode`] tells the shell whether the flow succeeded; flow
//! errors never abort the process.

use std::process::ExitCode;
use std::time::Duration;

use console::Term;
use facewatch_core::error::CoreError;
use facewatch_session::analysis::{ResultsView, ANALYSIS_FAILED, MISSING_VIDEO_ID};
use facewatch_session::dashboard::TAG_FAILED;
use facewatch_session::training::TRAIN_FAILED;
use facewatch_session::{FacewatchContext, FlowError};

use crate::render;

/// How the person name was given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Person {
    /// Must already be in the subjects list.
    Existing(String),
    /// Free text; creates the subject if the backend does not know it.
    New(String),
}

fn fail(error: &FlowError, fallback: &str) -> ExitCode {
    println!("{}", render::error(&error.display_message(fallback)));
    ExitCode::FAILURE
}

pub async fn dashboard(context: &FacewatchContext) -> ExitCode {
    let dashboard = context.dashboard();
    let loaded = dashboard.load().await;
    println!("{}", render::dashboard(&dashboard.view().await));

    match loaded {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

pub async fn archive(context: &FacewatchContext) -> ExitCode {
    let archive = context.archive();
    let loaded = archive.load().await;
    println!("{}", render::archive(&archive.view().await));

    match loaded {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

pub async fn analyze(context: &FacewatchContext, video_url: &str) -> ExitCode {
    let analysis = context.analysis();
    analysis.set_video_url(video_url).await;

    match analysis.submit().await {
        Ok(results) => {
            println!("{}", render::results(&results));
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e, ANALYSIS_FAILED),
    }
}

pub fn results(video_id: &str) -> ExitCode {
    match ResultsView::for_video(video_id) {
        Ok(view) => {
            println!("{}", render::results(&view));
            ExitCode::SUCCESS
        }
        Err(e) => fail(&FlowError::from(e), MISSING_VIDEO_ID),
    }
}

/// Resolve `person` to the name to submit, checking existing subjects
/// against the cache.
async fn resolve_person(context: &FacewatchContext, person: Person) -> Result<String, FlowError> {
    match person {
        Person::New(name) => Ok(name),
        Person::Existing(name) => {
            let snapshot = context.subjects.wait_until_loaded().await;
            if snapshot.subjects.iter().any(|s| s == name.trim()) {
                Ok(name)
            } else {
                Err(CoreError::NotFound {
                    entity: "subject",
                    id: name,
                }
                .into())
            }
        }
    }
}

pub async fn tag(
    context: &FacewatchContext,
    video_id: &str,
    face_index: usize,
    person: Person,
) -> ExitCode {
    let dashboard = context.dashboard();
    if dashboard.load().await.is_err() {
        println!("{}", render::dashboard(&dashboard.view().await));
        return ExitCode::FAILURE;
    }

    if let Err(e) = dashboard.open_tag(video_id, face_index).await {
        return fail(&e, TAG_FAILED);
    }

    let name = match resolve_person(context, person).await {
        Ok(name) => name,
        Err(e) => {
            dashboard.cancel_tag().await;
            return fail(&e, TAG_FAILED);
        }
    };

    let saved = match dashboard.select_subject(&name).await {
        Ok(()) => dashboard.save_tag().await,
        Err(e) => Err(e),
    };

    match saved {
        Ok(_) => {
            println!("{}", render::dashboard(&dashboard.view().await));
            ExitCode::SUCCESS
        }
        Err(e) => match dashboard.view().await.modal {
            Some(modal) if modal.error.is_some() => {
                println!("{}", render::tag_modal(&modal));
                ExitCode::FAILURE
            }
            _ => fail(&e, TAG_FAILED),
        },
    }
}

pub async fn train(
    context: &FacewatchContext,
    person: Person,
    image_url: &str,
    confirmation_delay: Duration,
) -> ExitCode {
    let training = context.training(confirmation_delay);

    let chosen = match person {
        Person::New(name) => training.choose_new(&name).await,
        existing @ Person::Existing(_) => match resolve_person(context, existing).await {
            Ok(name) => training.choose_existing(&name).await,
            Err(e) => Err(e),
        },
    };
    if let Err(e) = chosen {
        return fail(&e, TRAIN_FAILED);
    }
    if let Err(e) = training.set_image_url(image_url).await {
        return fail(&e, TRAIN_FAILED);
    }

    let code = match training.submit().await {
        Ok(_) => {
            let shown = render::training(&training.view().await);
            println!("{shown}");
            hold_confirmation(&shown, confirmation_delay).await;
            ExitCode::SUCCESS
        }
        Err(_) => {
            println!("{}", render::training(&training.view().await));
            ExitCode::FAILURE
        }
    };

    training.shutdown();
    code
}

/// Keep the confirmation on screen for `delay`, then clear it on a terminal.
async fn hold_confirmation(shown: &str, delay: Duration) {
    let term = Term::stdout();
    if !term.is_term() {
        return;
    }

    tokio::time::sleep(delay).await;
    if let Err(e) = term.clear_last_lines(shown.lines().count()) {
        tracing::debug!(error = %e, "Could not clear confirmation");
    }
}

pub async fn subjects(context: &FacewatchContext, refresh: bool) -> ExitCode {
    let mut snapshot = context.subjects.wait_until_loaded().await;
    if refresh {
        context.subjects.refresh().await;
        snapshot = context.subjects.snapshot();
    }

    println!("{}", render::subjects(&snapshot));
    if snapshot.error.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
