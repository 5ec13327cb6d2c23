mod config;

use anyhow::Context;
use haven_assistant::{LocalFile, NoticeLevel};
use haven_chat::{ChatAvailability, ChatController, ChatEvent, SubmissionOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LoggingSettings, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let settings = Settings::load().context("Failed to load configuration")?;
    init_logging(&settings.logging);

    let (tx, rx) = mpsc::unbounded_channel();
    let builder = ChatController::builder()
        .polling(settings.polling.clone().into())
        .events(tx);

    let chat = match ChatAvailability::from_env(builder)? {
        ChatAvailability::Ready(chat) => chat,
        ChatAvailability::ConfigurationRequired { missing } => {
            eprintln!("Chat is not configured. Set {} and restart.", missing.join(", "));
            return Ok(());
        }
    };

    tokio::spawn(render_events(rx));

    let thread_id = chat
        .initialize()
        .await
        .context("Failed to start chat session")?;
    tracing::info!(%thread_id, "chat session ready");

    println!("Ask a question, /attach <path> to add a document, /status, /quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Vec<LocalFile> = Vec::new();

    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Quit => break,
            Command::Status => {
                println!("{}", serde_json::to_string_pretty(&chat.snapshot())?);
            }
            Command::Attach(path) => match LocalFile::from_path(path).await {
                Ok(file) => {
                    println!("Attached {} ({} bytes)", file.name(), file.size());
                    pending.push(file);
                }
                Err(e) => eprintln!("Cannot read {}: {}", path, e),
            },
            Command::Message(text) => {
                let files = std::mem::take(&mut pending);
                match chat.send_message(text, files).await {
                    Ok(SubmissionOutcome::Answered { replies }) => {
                        for reply in replies {
                            println!("\nassistant> {}\n", reply.content);
                        }
                    }
                    Ok(SubmissionOutcome::Ignored) => {}
                    Err(e) => eprintln!("error: {}", e.display_message()),
                }
            }
        }
    }

    Ok(())
}

enum Command<'a> {
    Quit,
    Status,
    Attach(&'a str),
    Message(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line {
            "/quit" | "/exit" => Command::Quit,
            "/status" => Command::Status,
            _ => match line.strip_prefix("/attach ") {
                Some(path) => Command::Attach(path.trim()),
                None => Command::Message(line),
            },
        }
    }
}

async fn render_events(mut rx: mpsc::UnboundedReceiver<ChatEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            ChatEvent::StatusChanged {
                content: Some(status),
            } => println!("… {}", status),
            ChatEvent::UploadProgress { progress } => {
                println!("  {} {}%", progress.filename, progress.progress)
            }
            ChatEvent::Notice { notice } => {
                let marker = match notice.level {
                    NoticeLevel::Success => "✓",
                    NoticeLevel::Error => "✗",
                };
                match notice.description {
                    Some(description) => println!("{} {}: {}", marker, notice.title, description),
                    None => println!("{} {}", marker, notice.title),
                }
            }
            ChatEvent::RunStatus {
                status, attempt, ..
            } => tracing::debug!(%status, attempt, "run status"),
            _ => {}
        }
    }
}

fn init_logging(config: &LoggingSettings) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // stdout belongs to the conversation
    match config.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
