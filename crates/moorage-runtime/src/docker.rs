//! Docker daemon adapter.
//!
//! Implements [`ContainerRegistry`] on top of `bollard`. The daemon already
//! demultiplexes non-TTY log streams into stdout/stderr messages; the
//! adapter flattens those messages back into a plain byte stream so the
//! framer sees one ordered sequence of chunks.

use std::time::Duration;

use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{
    InspectContainerOptions, ListContainersOptions, LogOutput, LogsOptions,
    RestartContainerOptions, StartContainerOptions, StopContainerOptions,
};
use bollard::errors::Error as BollardError;
use bollard::models::ContainerSummary;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use tracing::{debug, info};

use moorage_core::ports::{ContainerRegistry, LogHandle, LogOptions, RegistryError};
use moorage_core::Container;

/// HTTP status the daemon returns when a start/stop was a no-op.
const NOT_MODIFIED: u16 = 304;
const NOT_FOUND: u16 = 404;

/// Container registry backed by the local Docker daemon.
#[derive(Debug, Clone)]
pub struct DockerRegistry {
    docker: Docker,
}

impl DockerRegistry {
    /// Connect using the platform defaults (`DOCKER_HOST` or the local socket).
    ///
    /// The connection is lazy: an unreachable daemon surfaces on the first call.
    pub fn connect() -> Result<Self, RegistryError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        info!("docker client configured");
        Ok(Self { docker })
    }

    /// Wrap an existing client.
    pub const fn from_client(docker: Docker) -> Self {
        Self { docker }
    }
}

#[async_trait]
impl ContainerRegistry for DockerRegistry {
    async fn list(&self, all: bool) -> Result<Vec<Container>, RegistryError> {
        let summaries = self
            .docker
            .list_containers(Some(ListContainersOptions::<String> {
                all,
                ..Default::default()
            }))
            .await
            .map_err(|e| classify(e, ""))?;
        Ok(summaries.into_iter().map(container_from_summary).collect())
    }

    async fn start(&self, id: &str) -> Result<(), RegistryError> {
        match self
            .docker
            .start_container(id, None::<StartContainerOptions<String>>)
            .await
        {
            Ok(()) => Ok(()),
            Err(BollardError::DockerResponseServerError {
                status_code: NOT_MODIFIED,
                ..
            }) => {
                debug!(container = %id, "container already running");
                Ok(())
            }
            Err(e) => Err(classify(e, id)),
        }
    }

    async fn stop(&self, id: &str, grace: Duration) -> Result<(), RegistryError> {
        let options = StopContainerOptions {
            t: i64::try_from(grace.as_secs()).unwrap_or(i64::MAX),
        };
        match self.docker.stop_container(id, Some(options)).await {
            Ok(()) => Ok(()),
            Err(BollardError::DockerResponseServerError {
                status_code: NOT_MODIFIED,
                ..
            }) => {
                debug!(container = %id, "container already stopped");
                Ok(())
            }
            Err(e) => Err(classify(e, id)),
        }
    }

    async fn restart(&self, id: &str, grace: Duration) -> Result<(), RegistryError> {
        let options = RestartContainerOptions {
            t: isize::try_from(grace.as_secs()).unwrap_or(isize::MAX),
        };
        self.docker
            .restart_container(id, Some(options))
            .await
            .map_err(|e| classify(e, id))
    }

    async fn logs(&self, id: &str, options: LogOptions) -> Result<LogHandle, RegistryError> {
        // The logs endpoint only reports a missing container once polled;
        // inspect first so acquisition fails before any output is committed.
        self.docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .map_err(|e| classify(e, id))?;

        let docker = self.docker.clone();
        let container_id = id.to_string();
        let request = LogsOptions::<String> {
            follow: options.follow,
            stdout: options.stdout,
            stderr: options.stderr,
            timestamps: options.timestamps,
            tail: options.tail,
            ..Default::default()
        };

        let stream = async_stream::stream! {
            let mut upstream = Box::pin(docker.logs(&container_id, Some(request)));
            while let Some(item) = upstream.next().await {
                match item {
                    Ok(output) => yield Ok(log_payload(output)),
                    Err(e) => {
                        yield Err(classify(e, &container_id));
                        break;
                    }
                }
            }
            debug!(container = %container_id, "upstream log stream closed");
        };

        Ok(LogHandle::from_stream(id, stream))
    }
}

fn log_payload(output: LogOutput) -> Bytes {
    match output {
        LogOutput::StdOut { message }
        | LogOutput::StdErr { message }
        | LogOutput::Console { message }
        | LogOutput::StdIn { message } => message,
    }
}

/// Map a bollard error onto the port taxonomy.
fn classify(err: BollardError, id: &str) -> RegistryError {
    match err {
        BollardError::DockerResponseServerError {
            status_code: NOT_FOUND,
            ..
        } => RegistryError::NotFound(id.to_string()),
        BollardError::DockerResponseServerError { message, .. } => {
            RegistryError::Rejected(message)
        }
        other => RegistryError::Unavailable(other.to_string()),
    }
}

fn container_from_summary(summary: ContainerSummary) -> Container {
    let name = summary
        .names
        .as_deref()
        .and_then(<[String]>::first)
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_default();
    let created = summary
        .created
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .unwrap_or_default();

    Container {
        id: summary.id.unwrap_or_default(),
        name,
        image: summary.image.unwrap_or_default(),
        state: summary.state.unwrap_or_default(),
        status: summary.status.unwrap_or_default(),
        created,
        labels: summary.labels.unwrap_or_default(),
    }
}
