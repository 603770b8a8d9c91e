//! Port fakes shared by service tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream;

use crate::domain::Container;
use crate::ports::{
    CommandError, CommandOutput, CommandRunner, CommandSpec, ContainerRegistry, LogHandle,
    LogOptions, RegistryError,
};

/// In-memory registry that records every call.
#[derive(Default)]
pub struct FakeRegistry {
    pub containers: Vec<Container>,
    pub fail_list: bool,
    /// Delay applied to every call, for deadline tests.
    pub delay: Option<Duration>,
    pub calls: Mutex<Vec<String>>,
    pub last_log_options: Mutex<Option<LogOptions>>,
    /// When set, the log stream's first item is this daemon refusal.
    pub refuse_logs: Option<String>,
}

impl FakeRegistry {
    pub fn with_containers(containers: Vec<Container>) -> Self {
        Self {
            containers,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, call: String) {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn known(&self, id: &str) -> Result<(), RegistryError> {
        if self.containers.iter().any(|c| c.id == id) {
            Ok(())
        } else {
            Err(RegistryError::NotFound(id.to_string()))
        }
    }
}

#[async_trait]
impl ContainerRegistry for FakeRegistry {
    async fn list(&self, all: bool) -> Result<Vec<Container>, RegistryError> {
        self.enter(format!("list all={all}")).await;
        if self.fail_list {
            return Err(RegistryError::Unavailable("socket missing".to_string()));
        }
        Ok(self.containers.clone())
    }

    async fn start(&self, id: &str) -> Result<(), RegistryError> {
        self.enter(format!("start {id}")).await;
        self.known(id)
    }

    async fn stop(&self, id: &str, grace: Duration) -> Result<(), RegistryError> {
        self.enter(format!("stop {id} grace={}", grace.as_secs())).await;
        self.known(id)
    }

    async fn restart(&self, id: &str, grace: Duration) -> Result<(), RegistryError> {
        self.enter(format!("restart {id} grace={}", grace.as_secs())).await;
        self.known(id)
    }

    async fn logs(&self, id: &str, options: LogOptions) -> Result<LogHandle, RegistryError> {
        self.enter(format!("logs {id}")).await;
        self.known(id)?;
        *self.last_log_options.lock().unwrap() = Some(options);
        let body: Vec<Result<Bytes, RegistryError>> = match &self.refuse_logs {
            Some(reason) => vec![Err(RegistryError::Rejected(reason.clone()))],
            None => vec![Ok(Bytes::from_static(b"line\n"))],
        };
        Ok(LogHandle::from_stream(id, stream::iter(body)))
    }
}

/// Runner that replays scripted outputs in order and records every spec.
#[derive(Default)]
pub struct ScriptedRunner {
    pub outputs: Mutex<VecDeque<Result<CommandOutput, CommandError>>>,
    pub calls: Mutex<Vec<(CommandSpec, Duration)>>,
}

impl ScriptedRunner {
    pub fn new(outputs: Vec<Result<CommandOutput, CommandError>>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn specs(&self) -> Vec<CommandSpec> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(spec, _)| spec.clone())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        spec: &CommandSpec,
        deadline: Duration,
    ) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push((spec.clone(), deadline));
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(CommandOutput::ok("")))
    }
}
