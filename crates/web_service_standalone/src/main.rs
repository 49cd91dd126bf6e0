use std::io::Write;

use anyhow::{bail, Context};
use chat_core::Config;
use chat_state::PipContent;
use clap::{Parser, Subcommand};
use relay_client::{AssistantController, RelayClient};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use transcript_store::FileLibraryProvider;
use web_service::config::load_server_settings;
use web_service::WebService;

#[derive(Parser)]
#[command(name = "transcript-assistant", about = "Run prompt templates against stored transcripts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the completion relay and the library routes
    Serve {
        #[arg(long, env = "APP_PORT")]
        port: Option<u16>,
    },
    /// Run one prompt against one transcript and print the reply
    Generate {
        /// Transcript id
        transcript: String,
        /// Prompt label, as shown on its button
        prompt: String,
        /// Relay base URL. Without it a relay is started in-process.
        #[arg(long, env = "RELAY_URL")]
        relay_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::new();

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            tracing::info!(port = config.port, "Starting transcript assistant relay");
            web_service::server::run(config)
                .await
                .map_err(anyhow::Error::msg)
                .context("Failed to run web service")
        }
        Command::Generate {
            transcript,
            prompt,
            relay_url,
        } => generate(config, &transcript, &prompt, relay_url).await,
    }
}

async fn generate(
    config: Config,
    transcript: &str,
    prompt: &str,
    relay_url: Option<String>,
) -> anyhow::Result<()> {
    let library = FileLibraryProvider::new(&config.library_dir);

    let mut local_relay = None;
    let relay_url = match relay_url {
        Some(url) => url,
        None => {
            let port = config.port;
            let host = load_server_settings().host;
            let mut service = WebService::new(config);
            service
                .start(port)
                .await
                .map_err(anyhow::Error::msg)
                .context("Failed to start in-process relay")?;
            local_relay = Some(service);
            format!("http://{host}:{port}")
        }
    };

    let mut controller = AssistantController::new(RelayClient::new(relay_url));
    controller.load_library(&library).await;

    let state = controller.machine().state();
    if let Some(error) = &state.library_error {
        bail!("Failed to load library: {error}");
    }
    if state.transcripts.iter().all(|t| t.id != transcript) {
        bail!("Unknown transcript: {transcript}");
    }
    if state.prompt(prompt).is_none() {
        bail!("Unknown prompt: {prompt}");
    }

    controller.select_transcript(transcript);
    controller.click_prompt(prompt);

    let mut stdout = std::io::stdout();
    let mut printed = 0;
    while controller.machine().state().is_loading() {
        if !controller.process_next().await {
            break;
        }
        if let PipContent::Response(text) = controller.machine().pip_content() {
            if text.len() > printed {
                write!(stdout, "{}", &text[printed..])?;
                stdout.flush()?;
                printed = text.len();
            }
        }
    }
    writeln!(stdout)?;

    if let Some(mut service) = local_relay {
        if let Err(e) = service.stop().await {
            tracing::warn!(error = %e, "In-process relay did not stop cleanly");
        }
    }

    match controller.machine().state().error() {
        Some(error) => bail!("Generation failed: {error}"),
        None => Ok(()),
    }
}
