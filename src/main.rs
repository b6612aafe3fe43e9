use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use converse::api::BackendClient;
use converse::assistants::AssistantDirectory;
use converse::session::transcript;
use converse::{Config, SyncController};
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "converse", about = "Chat session sync engine CLI", version)]
struct Cli {
    /// Backend origin, overriding config and environment.
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one user turn and print the updated log
    Send {
        /// Assistant context (falls back to config default_assistant)
        #[arg(long)]
        assistant: Option<String>,
        /// Message text
        text: String,
        /// Continue a stored session instead of starting fresh
        #[arg(long)]
        session: Option<String>,
        /// Model for this turn (falls back to config default_model)
        #[arg(long)]
        model: Option<String>,
    },
    /// Manage chat sessions
    Sessions {
        #[arg(long)]
        assistant: Option<String>,
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Manage assistants
    Assistants {
        #[command(subcommand)]
        action: AssistantAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// List stored sessions
    List,
    /// Create a new empty session
    New,
    /// Print a stored session's transcript
    Show { id: String },
    /// Delete a stored session
    Delete { id: String },
}

#[derive(Subcommand)]
enum AssistantAction {
    /// List assistants
    List,
    /// Create an assistant
    Create {
        title: String,
        #[arg(long, default_value = "This is the role setting.")]
        role: String,
    },
    /// Rename an assistant
    Rename { current: String, new: String },
    /// Delete an assistant
    Delete { title: String },
    /// Print an assistant's role setting
    Role { title: String },
    /// Update an assistant's role setting
    SetRole { title: String, role: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respects RUST_LOG env var, defaults to INFO
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let mut config = Config::load()?;
    if let Some(backend) = cli.backend {
        config.backend_url = backend;
    }

    let client = || {
        BackendClient::with_timeouts(
            &config.backend_url,
            Duration::from_secs(config.request_timeout_secs),
            Duration::from_secs(config.connect_timeout_secs),
        )
    };

    let assistant_for = |explicit: Option<String>| -> Result<String> {
        explicit
            .or_else(|| config.default_assistant.clone())
            .context("no assistant given; pass --assistant or set default_assistant in config")
    };

    match cli.command {
        Commands::Send {
            assistant,
            text,
            session,
            model,
        } => {
            let controller = SyncController::new(client(), assistant_for(assistant)?);
            if let Some(id) = session {
                controller.load_session(&id).await?;
            }
            let model = model.or_else(|| config.default_model.clone());
            // A failed exchange still leaves the notice in the log; print
            // the log either way and report the failure through the exit.
            let outcome = controller.send_turn(&text, Vec::new(), model.as_deref()).await;
            println!("{}", transcript::encode(&controller.messages()));
            outcome?;
        }
        Commands::Sessions { assistant, action } => {
            let controller = SyncController::new(client(), assistant_for(assistant)?);
            match action {
                SessionAction::List => {
                    for session in controller.refresh_sessions().await? {
                        println!("{}", session.id);
                    }
                }
                SessionAction::New => {
                    let session = controller.new_session().await?;
                    println!("{}", session.id);
                }
                SessionAction::Show { id } => {
                    controller.load_session(&id).await?;
                    println!("{}", transcript::encode(&controller.messages()));
                }
                SessionAction::Delete { id } => {
                    controller.delete_session(&id).await?;
                }
            }
        }
        Commands::Assistants { action } => {
            let directory = AssistantDirectory::new(client());
            match action {
                AssistantAction::List => {
                    for record in directory.list().await? {
                        println!("{}", record.title);
                    }
                }
                AssistantAction::Create { title, role } => {
                    directory.create(&title, &role).await?;
                }
                AssistantAction::Rename { current, new } => {
                    directory.rename(&current, &new).await?;
                }
                AssistantAction::Delete { title } => {
                    directory.delete(&title).await?;
                }
                AssistantAction::Role { title } => {
                    println!("{}", directory.role_setting(&title).await?);
                }
                AssistantAction::SetRole { title, role } => {
                    directory.update_role_setting(&title, &role).await?;
                }
            }
        }
    }

    Ok(())
}
