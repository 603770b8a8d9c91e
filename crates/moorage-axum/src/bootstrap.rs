//! Composition root for the Axum server.
//!
//! Builds the concrete adapters (Docker registry, process runner), wires
//! them into the core services and runs the server with graceful shutdown.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use moorage_core::{AppConfig, CommandRunner, ContainerRegistry, ContainerService, ProjectService};
use moorage_runtime::{DockerRegistry, ProcessCommandRunner};

use crate::routes::create_router;

/// CORS configuration for the HTTP server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow every origin.
    #[default]
    AllowAll,
    /// Allow only the listed origins.
    AllowOrigins(Vec<String>),
}

impl CorsConfig {
    /// `AllowAll` when no origins are given.
    pub fn from_origins(origins: Vec<String>) -> Self {
        if origins.is_empty() {
            Self::AllowAll
        } else {
            Self::AllowOrigins(origins)
        }
    }
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub app: AppConfig,
    pub cors: CorsConfig,
}

impl ServerConfig {
    pub fn new(app: AppConfig) -> Self {
        Self {
            app,
            cors: CorsConfig::default(),
        }
    }

    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::from_origins(origins);
        self
    }
}

/// Everything the handlers need.
pub struct AxumContext {
    pub containers: Arc<ContainerService>,
    pub projects: Arc<ProjectService>,
    /// Root shutdown token; log sessions derive child tokens from it.
    pub shutdown: CancellationToken,
}

/// Build the context with the production adapters.
pub fn bootstrap(config: &ServerConfig, shutdown: CancellationToken) -> Result<AxumContext> {
    let registry: Arc<dyn ContainerRegistry> =
        Arc::new(DockerRegistry::connect().context("configure docker client")?);
    let runner: Arc<dyn CommandRunner> = Arc::new(ProcessCommandRunner::new());
    Ok(bootstrap_with(&config.app, registry, runner, shutdown))
}

/// Build the context from explicit adapters.
pub fn bootstrap_with(
    app: &AppConfig,
    registry: Arc<dyn ContainerRegistry>,
    runner: Arc<dyn CommandRunner>,
    shutdown: CancellationToken,
) -> AxumContext {
    let containers = Arc::new(ContainerService::new(Arc::clone(&registry), app.timeouts));
    let projects = Arc::new(ProjectService::new(app, registry, runner));
    AxumContext {
        containers,
        projects,
        shutdown,
    }
}

/// Bind, serve and shut down gracefully when `shutdown` is cancelled.
///
/// After cancellation the listener stops accepting and in-flight requests
/// get `timeouts.shutdown_grace` to finish; the server task is aborted
/// after that.
pub async fn start_server(config: ServerConfig, shutdown: CancellationToken) -> Result<()> {
    config.app.validate()?;

    let ctx = bootstrap(&config, shutdown.clone())?;
    let app = create_router(ctx, &config.cors);

    let addr = config.app.listen_addr;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("listen {addr}"))?;

    info!(
        addr = %addr,
        project_root = %config.app.project_root.display(),
        compose = %config.app.compose_program,
        "moorage API listening on http://{addr}"
    );

    let mut server = tokio::spawn({
        let stop = shutdown.clone();
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(stop.cancelled_owned())
                .await
        }
    });

    tokio::select! {
        joined = &mut server => {
            joined.context("server task failed")??;
            return Ok(());
        }
        () = shutdown.cancelled() => {}
    }

    let grace = config.app.timeouts.shutdown_grace;
    info!(grace = ?grace, "shutdown requested; draining in-flight requests");

    if let Ok(joined) = tokio::time::timeout(grace, &mut server).await {
        joined.context("server task failed")??;
        info!("server shut down");
    } else {
        warn!(grace = ?grace, "in-flight requests did not finish; aborting");
        server.abort();
    }
    Ok(())
}
