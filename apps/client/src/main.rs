mod api_client;
mod auth;
mod config;
mod errors;
mod models;
mod render;
mod state;
mod workflow;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::auth::{AuthSession, FileSession, StaticSession};
use crate::config::Config;
use crate::models::resume::ExperienceLevel;
use crate::render::{render_state, ResumeSummary, LOADING_MESSAGE};
use crate::state::AppState;
use crate::workflow::file_acquisition::{FileAcquisition, FileSource, SelectedFile};
use crate::workflow::retrieval::{MatchRetrievalController, RetrievalState};
use crate::workflow::submission::{SubmissionController, SubmitOutcome};

#[derive(Parser, Debug)]
#[command(
    name = "jobalign",
    about = "Upload a resume, have it parsed, and list matching jobs",
    version
)]
struct Cli {
    /// Override the configured service URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a resume and show the jobs it matches
    Match(MatchArgs),
    /// Store a session token for later match requests
    Login {
        #[arg(long)]
        token: String,
    },
    /// Forget the stored session token
    Logout,
    /// Show whether a session token is stored
    Status,
}

#[derive(Args, Debug)]
struct MatchArgs {
    /// Resume document (PDF, DOCX, DOC or RTF)
    #[arg(long)]
    file: PathBuf,
    /// Years of experience: 0-9, or 10+ for ten or more
    #[arg(long)]
    experience: ExperienceLevel,
    /// Use this token instead of the stored session
    #[arg(long)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    // Logs go to stderr so rendered results on stdout stay clean
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("jobalign={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting JobAlign client v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Match(args) => {
            let state = AppState::new(config)?;
            let run_id = Uuid::new_v4();
            run_match(&state, args)
                .instrument(info_span!("match_run", %run_id))
                .await
        }
        Command::Login { token } => {
            let mut session = FileSession::load(&config.token_file)?;
            session.login(&token)?;
            println!("Logged in. Token stored at {}", session.path().display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Logout => {
            let mut session = FileSession::load(&config.token_file)?;
            session.logout()?;
            println!("Logged out.");
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => {
            let session = FileSession::load(&config.token_file)?;
            if session.current_token().is_some() {
                println!("Logged in ({})", session.path().display());
            } else {
                println!("Not logged in.");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Upload → handoff → match → render, cancelled as a whole on Ctrl-C.
async fn run_match(state: &AppState, args: MatchArgs) -> Result<ExitCode> {
    let mut submission = SubmissionController::new(state.api.clone());
    let mut retrieval = MatchRetrievalController::new(state.api.clone());
    tokio::spawn({
        let handles = [
            submission.cancellation_handle(),
            retrieval.cancellation_handle(),
        ];
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted; cancelling in-flight requests");
                handles.iter().for_each(CancellationToken::cancel);
            }
        }
    });

    let mut files = FileAcquisition::default();
    let file = SelectedFile::from_path(&args.file).await?;
    files.select_file(FileSource::Picker(vec![file]));

    submission.set_experience(Some(args.experience));
    submission.sync_selection(&files);

    if !submission.can_submit(&files) {
        eprintln!("A resume file and an experience level are both required.");
        return Ok(ExitCode::FAILURE);
    }
    if let (Some(file), Some(experience)) = (files.selected(), submission.experience()) {
        println!(
            "Uploading {} ({}), {} of experience...",
            file.name(),
            file.display_size(),
            experience.label()
        );
    }

    let outcome = submission.submit(&files).await;
    debug!(state = ?submission.state(), "Upload settled");
    let handoff = match outcome {
        SubmitOutcome::Handoff(handoff) => handoff,
        SubmitOutcome::Failed(message) => {
            eprintln!("Error uploading resume: {message}");
            return Ok(ExitCode::FAILURE);
        }
        SubmitOutcome::Cancelled => {
            eprintln!("Upload cancelled.");
            return Ok(ExitCode::FAILURE);
        }
        SubmitOutcome::NotReady | SubmitOutcome::AlreadySubmitting => {
            eprintln!("A resume file and an experience level are both required.");
            return Ok(ExitCode::FAILURE);
        }
    };

    let session: Box<dyn AuthSession> = match args.token {
        Some(token) => Box::new(StaticSession::new(Some(token))),
        None => Box::new(FileSession::load(&state.config.token_file)?),
    };

    println!("{LOADING_MESSAGE}");
    retrieval.arrive(Some(handoff), session.as_ref()).await;

    let summary = ResumeSummary::from_input(retrieval.input());
    println!("{}", render_state(&summary, retrieval.state()));

    Ok(match retrieval.state() {
        RetrievalState::Success(_) => ExitCode::SUCCESS,
        RetrievalState::Loading | RetrievalState::Error(_) => ExitCode::FAILURE,
    })
}
