use std::sync::Arc;

use anthropic_relay::{app, AnthropicProvider, AppConfig, AppState};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    init_tracing();

    info!("Loading application configuration");
    let config = AppConfig::from_env().unwrap_or_else(|e| {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    });
    debug!(
        "Configuration loaded: port={}, host={}, worker_threads={}, upstream={:?}",
        config.port, config.host, config.worker_threads, config.upstream
    );

    info!(
        "Configuring tokio runtime with {} worker threads",
        config.worker_threads
    );
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_stack_size(2 * 1024 * 1024)
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            error!("Failed to build tokio runtime: {}", e);
            std::process::exit(1);
        });

    runtime.block_on(serve(config));
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    );
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

async fn serve(config: AppConfig) {
    let provider = AnthropicProvider::new(&config.upstream).unwrap_or_else(|e| {
        error!("Failed to initialise Anthropic provider: {}", e);
        std::process::exit(1);
    });
    let state = AppState::new(Arc::new(provider), config.defaults.clone());

    debug!("Creating application router");
    let router = app(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind {}:{}: {}", config.host, config.port, e);
            std::process::exit(1);
        });

    info!("Anthropic relay listening on {}:{}", config.host, config.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| {
            error!("Server error: {}", e);
            std::process::exit(1);
        });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install CTRL+C signal handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            debug!("CTRL+C signal received");
        },
        _ = terminate => {
            debug!("Terminate signal received");
        },
    }
    info!("Shutdown signal received, starting graceful shutdown");
}
