//! Serve command handler.

use clap::Args;
use coursemate_core::{config::AppConfig, AppResult};
use coursemate_rag::RagSystem;
use coursemate_server::AppState;
use std::path::PathBuf;
use std::sync::Arc;

/// Run the HTTP API
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory of static frontend files to serve at /
    #[arg(long)]
    pub frontend: Option<PathBuf>,
}

impl ServeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let mut server = config.server.clone();
        if let Some(host) = &self.host {
            server.host = host.clone();
        }
        if let Some(port) = self.port {
            server.port = port;
        }
        if let Some(frontend) = &self.frontend {
            server.frontend_dir = Some(frontend.clone());
        }

        let rag = RagSystem::from_config(config).await?;
        let state = Arc::new(AppState::new(rag));

        coursemate_server::serve(&server, state).await
    }
}
