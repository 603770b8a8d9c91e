//! Container service - listing, lifecycle actions and log handles.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{DEFAULT_TAIL, Timeouts};
use crate::domain::{Container, ContainerAction, sort_containers};
use crate::ports::{ContainerRegistry, CoreError, LogHandle, LogOptions, RegistryError};

/// Tail value sent upstream: the client's value verbatim, or the default
/// when it is absent or empty.
pub fn resolve_tail(raw: Option<&str>) -> String {
    match raw {
        Some(tail) if !tail.is_empty() => tail.to_string(),
        _ => DEFAULT_TAIL.to_string(),
    }
}

/// Service for container operations against the registry.
pub struct ContainerService {
    registry: Arc<dyn ContainerRegistry>,
    timeouts: Timeouts,
}

impl ContainerService {
    /// Create a new container service.
    pub fn new(registry: Arc<dyn ContainerRegistry>, timeouts: Timeouts) -> Self {
        Self { registry, timeouts }
    }

    /// Shared handle to the underlying registry.
    pub fn registry(&self) -> Arc<dyn ContainerRegistry> {
        Arc::clone(&self.registry)
    }

    /// All containers, including stopped ones, in display order.
    pub async fn list(&self) -> Result<Vec<Container>, CoreError> {
        let mut containers = self
            .bounded(self.registry.list(true))
            .await
            .map_err(|e| CoreError::registry("list containers", e))?;
        sort_containers(&mut containers);
        debug!(count = containers.len(), "listed containers");
        Ok(containers)
    }

    /// Run a lifecycle action against one container.
    pub async fn perform(&self, id: &str, action: ContainerAction) -> Result<(), CoreError> {
        if id.trim().is_empty() {
            return Err(CoreError::Validation("missing container id".to_string()));
        }

        let grace = self.timeouts.stop_grace;
        let call = async {
            match action {
                ContainerAction::Start => self.registry.start(id).await,
                ContainerAction::Stop => self.registry.stop(id, grace).await,
                ContainerAction::Restart => self.registry.restart(id, grace).await,
            }
        };

        self.bounded(call)
            .await
            .map_err(|e| CoreError::registry(format!("{action} container {id}"), e))?;

        info!(container = %id, action = %action, "container action completed");
        Ok(())
    }

    /// Open a live log handle for one container.
    ///
    /// Acquisition includes waiting briefly for the first upstream item, so
    /// a refused log request fails here rather than after the response is
    /// committed. Only acquisition is bounded; the returned handle has no
    /// deadline.
    pub async fn open_logs(&self, id: &str, tail: &str) -> Result<LogHandle, CoreError> {
        let options = LogOptions::follow_tail(tail);
        let settle = self.timeouts.log_settle;
        let acquire = async {
            let handle = self.registry.logs(id, options).await?;
            handle.settle(settle).await
        };
        let handle = self
            .bounded(acquire)
            .await
            .map_err(|e| CoreError::registry(format!("open logs for container {id}"), e))?;
        debug!(container = %id, tail = %tail, "log handle acquired");
        Ok(handle)
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, RegistryError>>,
    ) -> Result<T, RegistryError> {
        let limit = self.timeouts.registry;
        tokio::time::timeout(limit, call)
            .await
            .unwrap_or(Err(RegistryError::Timeout(limit)))
    }
}
