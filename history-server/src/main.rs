use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

use history_core::GameRepository;
use history_server::{auth::AuthService, config::Config, create_routes, sessions::SessionManager};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    info!("Starting chess history server...");

    let config = Config::new();

    let repository = Arc::new(GameRepository::with_mock_history());
    info!(
        "Loaded {} games across {} days",
        repository.len(),
        repository.date_keys().count()
    );

    let session_manager = Arc::new(SessionManager::new(
        repository,
        config.initial_date,
        config.board_size,
    ));

    let auth_service = if config.auth_dev_mode {
        info!("Starting in development authentication mode - JWT validation disabled");
        Arc::new(AuthService::new_dev_mode())
    } else {
        let Some(key) = config.clerk_publishable_key.as_deref() else {
            tracing::error!("CLERK_PUBLISHABLE_KEY is not set.");
            tracing::error!("Set it to the app's Clerk publishable key, or set AUTH_DEV_MODE=true.");
            std::process::exit(1);
        };
        match AuthService::from_publishable_key(key) {
            Ok(service) => Arc::new(service),
            Err(e) => {
                tracing::error!("Failed to configure Clerk authentication: {}", e);
                std::process::exit(1);
            }
        }
    };

    let routes = create_routes(session_manager.clone(), auth_service);

    // Purge idle sessions
    let cleanup_session_manager = session_manager.clone();
    let session_timeout = Duration::from_secs(config.session_timeout_seconds);
    let cleanup_interval = Duration::from_secs(config.cleanup_interval_seconds.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            let removed = cleanup_session_manager
                .cleanup_inactive_sessions(session_timeout)
                .await;
            if removed > 0 {
                info!("Cleaned up {} inactive sessions", removed);
            }
        }
    });

    let ip = match config.host.parse::<std::net::IpAddr>() {
        Ok(ip) => ip,
        Err(e) => {
            tracing::error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };

    info!("Server starting on {}:{}", config.host, config.port);

    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown((ip, config.port), shutdown_signal());

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let (Ok(mut sigint), Ok(mut sigterm)) = (
            signal::unix::signal(signal::unix::SignalKind::interrupt()),
            signal::unix::signal(signal::unix::SignalKind::terminate()),
        ) else {
            tracing::error!("Failed to install signal handlers");
            return;
        };

        tokio::select! {
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down gracefully...");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl+c: {}", e);
            return;
        }
        info!("Received Ctrl+C, shutting down gracefully...");
    }
}
