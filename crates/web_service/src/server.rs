use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use chat_core::Config;
use llm_gateway::{LLMProvider, OpenAIProvider};
use log::{error, info, warn};
use tokio::sync::oneshot;
use transcript_store::{FileLibraryProvider, LibraryProvider};

use crate::config::{load_server_settings, ServerSettings};
use crate::controllers::{chat_controller, library_controller};
use crate::middleware::TracingMiddleware;

pub struct AppState {
    pub config: Config,
    /// `None` when no credential is configured; chat requests then fail with 500.
    pub provider: Option<Arc<dyn LLMProvider>>,
    pub library: Arc<dyn LibraryProvider>,
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        let provider = OpenAIProvider::from_config(&config)
            .map(|provider| Arc::new(provider) as Arc<dyn LLMProvider>);
        if provider.is_none() {
            warn!("OPENAI_API_KEY is not set; chat requests will be rejected");
        }

        let library: Arc<dyn LibraryProvider> =
            Arc::new(FileLibraryProvider::new(&config.library_dir));
        info!("Reading library from {}", config.library_dir.display());

        Self {
            config,
            provider,
            library,
        }
    }
}

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(chat_controller::config)
            .configure(library_controller::config),
    );
}

fn bind_server(
    app_state: web::Data<AppState>,
    settings: &ServerSettings,
    port: u16,
) -> Result<actix_web::dev::Server, String> {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(TracingMiddleware)
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .workers(settings.workers)
    .bind((settings.host.as_str(), port))
    .map_err(|e| format!("Failed to bind server: {e}"))?
    .run();

    info!("Starting web service on http://{}:{port}", settings.host);
    Ok(server)
}

/// Run the relay until the server stops.
pub async fn run(config: Config) -> Result<(), String> {
    let port = config.port;
    let settings = load_server_settings();
    let app_state = web::Data::new(AppState::from_config(config));

    let server = bind_server(app_state, &settings, port)?;

    if let Err(e) = server.await {
        error!("Web server error: {}", e);
        return Err(format!("Web server error: {e}"));
    }

    Ok(())
}

/// Relay running in the background of an embedding process.
pub struct WebService {
    shutdown_tx: Option<oneshot::Sender<()>>,
    server_handle: Option<tokio::task::JoinHandle<()>>,
    config: Config,
}

impl WebService {
    pub fn new(config: Config) -> Self {
        Self {
            shutdown_tx: None,
            server_handle: None,
            config,
        }
    }

    pub async fn start(&mut self, port: u16) -> Result<(), String> {
        if self.server_handle.is_some() {
            return Err("Web service is already running".to_string());
        }

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let settings = load_server_settings();
        let app_state = web::Data::new(AppState::from_config(self.config.clone()));
        let server = bind_server(app_state, &settings, port)?;
        let server_handle = server.handle();

        let task = tokio::spawn(async move {
            tokio::select! {
                result = server => {
                    if let Err(e) = result {
                        error!("Web server error: {}", e);
                    }
                }
                _ = &mut shutdown_rx => {
                    info!("Web service shutdown signal received");
                    server_handle.stop(true).await;
                }
            }
        });

        self.shutdown_tx = Some(shutdown_tx);
        self.server_handle = Some(task);

        info!("Web service started successfully");
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), String> {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            if shutdown_tx.send(()).is_err() {
                error!("Failed to send shutdown signal");
            }
        }

        if let Some(handle) = self.server_handle.take() {
            if let Err(e) = handle.await {
                error!("Error waiting for server shutdown: {}", e);
                return Err(format!("Error waiting for server shutdown: {e}"));
            }
        }

        info!("Web service stopped successfully");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.server_handle.is_some()
    }
}

impl Drop for WebService {
    fn drop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
    }
}
