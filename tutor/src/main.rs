use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tutor::api::{create_router, AppState};
use tutor::config::Config;
use tutor::ocr::TextExtractor;

#[derive(Parser)]
#[command(name = "tutor")]
#[command(about = "Self-hostable educational assistant for textbook pages")]
struct Args {
    /// Load the configured generation model before accepting requests
    #[arg(long)]
    load_model: bool,

    /// Override TUTOR_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutor=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Initializing OCR ({})...", config.ocr.languages);
    let extractor = TextExtractor::new(&config.ocr);
    if !extractor.is_available() {
        tracing::warn!("OCR unavailable - textbook analysis and text extraction will fail");
    }

    if config.speech.enabled {
        tracing::info!("Speech synthesis enabled via {}", config.speech.base_url);
    }

    let state = AppState::new(config.clone(), extractor)?;

    if args.load_model {
        tracing::info!("Loading generation model: {}...", config.generation.model);
        match state.engine.load(None).await {
            Ok(info) => tracing::info!(
                model = info.model.as_deref().unwrap_or_default(),
                fallback = info.is_fallback,
                "Model loaded"
            ),
            Err(e) => tracing::warn!("Model load failed: {} - load later via POST /api/v1/model:load", e),
        }
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Tutor starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
