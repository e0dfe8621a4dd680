//! `facewatch` -- operator console for the face-recognition workflow.
//!
//! Lists active and archived videos, queues new analyses, tags unknown
//! faces and adds training images, all through the workflow webhooks.
//!
//! # Environment variables
//!
//! | Variable                       | Required | Default                                  | Description                          |
//! |--------------------------------|----------|------------------------------------------|--------------------------------------|
//! | `FACEWATCH_WEBHOOK_BASE`       | no       | `https://n8n.sharedvisionai.org/webhook` | Base URL of the workflow webhooks    |
//! | `FACEWATCH_TRAIN_CONFIRM_SECS` | no       | `3`                                      | Seconds the training confirmation shows |
//! | `RUST_LOG`                     | no       | `facewatch=info,...`                     | Log filter, output goes to stderr    |

mod commands;
mod config;
mod render;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use facewatch_gateway::{FaceGateway, WebhookApi, WebhookEndpoints};
use facewatch_session::FacewatchContext;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::Person;
use crate::config::ConsoleConfig;

#[derive(Parser)]
#[command(name = "facewatch")]
#[command(about = "Operator console for face-recognition video analysis")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Videos currently in the pipeline, with their detected faces
    Dashboard,
    /// Videos that finished processing
    Archive,
    /// Queue a video for analysis
    Analyze {
        /// Public URL of the video
        url: String,
    },
    /// Show the in-progress panel for a queued video
    Results {
        video_id: String,
    },
    /// Name an unknown face
    Tag {
        video_id: String,
        /// Position of the face in the dashboard listing
        face_index: usize,
        #[command(flatten)]
        person: PersonArgs,
    },
    /// Add a training image for a subject
    Train {
        #[command(flatten)]
        person: PersonArgs,
        /// Public URL of the face image
        #[arg(long)]
        image_url: String,
    },
    /// List known subjects
    Subjects {
        /// Fetch the list again after the startup load
        #[arg(long)]
        refresh: bool,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct PersonArgs {
    /// An existing subject
    #[arg(long)]
    subject: Option<String>,
    /// A new subject name
    #[arg(long)]
    name: Option<String>,
}

impl PersonArgs {
    fn into_person(self) -> Person {
        match (self.subject, self.name) {
            (Some(subject), _) => Person::Existing(subject),
            (None, name) => Person::New(name.unwrap_or_default()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "facewatch=info,facewatch_gateway=info,facewatch_session=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ConsoleConfig::from_env()?;

    tracing::info!(webhook_base = %config.webhook_base, "Starting facewatch console");

    let gateway: Arc<dyn FaceGateway> = Arc::new(WebhookApi::new(WebhookEndpoints::from_base(
        &config.webhook_base,
    )));
    let context = FacewatchContext::start(gateway);

    let code = match cli.command {
        Command::Dashboard => commands::dashboard(&context).await,
        Command::Archive => commands::archive(&context).await,
        Command::Analyze { url } => commands::analyze(&context, &url).await,
        Command::Results { video_id } => commands::results(&video_id),
        Command::Tag {
            video_id,
            face_index,
            person,
        } => commands::tag(&context, &video_id, face_index, person.into_person()).await,
        Command::Train { person, image_url } => {
            commands::train(
                &context,
                person.into_person(),
                &image_url,
                config.train_confirmation,
            )
            .await
        }
        Command::Subjects { refresh } => commands::subjects(&context, refresh).await,
    };

    context.shutdown();
    Ok(code)
}
