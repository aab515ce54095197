//! Application orchestrator: wires registry, library and web server together.

use std::sync::Arc;

use gamehub_file_ops::GameLibrary;
use gamehub_registry::GameRegistry;
use gamehub_web_server::{AppState, ServerConfig, WebServer};

use crate::config::Config;

/// Runs the server until Ctrl-C or a server failure.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let registry = Arc::new(GameRegistry::builtin());
    tracing::info!(games = registry.len(), "game registry ready");

    if !config.download_root.is_dir() {
        tracing::warn!(
            path = %config.download_root.display(),
            "download root does not exist yet; every game will list no files"
        );
    }

    let library = GameLibrary::new(registry, config.download_root.clone());
    let state = AppState::new(library, config.static_dir.clone());
    let server = WebServer::new(
        ServerConfig {
            host: config.host.clone(),
            port: config.port,
        },
        state,
    );

    let server_run = Arc::clone(&server);
    let mut serve = tokio::spawn(async move { server_run.run().await });

    tokio::select! {
        result = &mut serve => {
            // The server only returns on its own when it failed to start or serve.
            result??;
            return Ok(());
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("SIGINT received, shutting down");
        }
    }

    server.shutdown();
    serve.await??;
    Ok(())
}
