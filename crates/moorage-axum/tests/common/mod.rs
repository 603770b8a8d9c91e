//! Shared fixtures for router tests: port fakes and request helpers.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Request, Response, StatusCode};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use moorage_axum::bootstrap::{CorsConfig, bootstrap_with};
use moorage_axum::routes::create_router;
use moorage_core::{
    AppConfig, COMPOSE_PROJECT_LABEL, CommandError, CommandOutput, CommandRunner, CommandSpec,
    Container, ContainerRegistry, LogHandle, LogOptions, RegistryError,
};

pub fn container(name: &str, state: &str, project: Option<&str>) -> Container {
    let mut labels = HashMap::new();
    if let Some(p) = project {
        labels.insert(COMPOSE_PROJECT_LABEL.to_string(), p.to_string());
    }
    Container {
        id: format!("{name}-id"),
        name: name.to_string(),
        image: "alpine:3".to_string(),
        state: state.to_string(),
        status: String::new(),
        created: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
        labels,
    }
}

/// Registry fake with per-container log feeds driven by the test.
#[derive(Default)]
pub struct FakeRegistry {
    pub containers: Vec<Container>,
    pub calls: Mutex<Vec<String>>,
    pub log_options: Mutex<Vec<LogOptions>>,
    /// When set, opened log streams fail on first poll with this refusal.
    pub refuse_logs: Option<String>,
    pub feeds: Mutex<HashMap<String, mpsc::Receiver<Bytes>>>,
}

impl FakeRegistry {
    pub fn with_containers(containers: Vec<Container>) -> Self {
        Self {
            containers,
            ..Self::default()
        }
    }

    /// Register a log feed for `id`; bytes sent on the returned sender are
    /// delivered to the next log stream opened for that container.
    pub fn feed(&self, id: &str) -> mpsc::Sender<Bytes> {
        let (tx, rx) = mpsc::channel(16);
        self.feeds.lock().unwrap().insert(id.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
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
        self.record(format!("list all={all}"));
        Ok(self.containers.clone())
    }

    async fn start(&self, id: &str) -> Result<(), RegistryError> {
        self.record(format!("start {id}"));
        self.known(id)
    }

    async fn stop(&self, id: &str, grace: Duration) -> Result<(), RegistryError> {
        self.record(format!("stop {id} grace={}", grace.as_secs()));
        self.known(id)
    }

    async fn restart(&self, id: &str, grace: Duration) -> Result<(), RegistryError> {
        self.record(format!("restart {id} grace={}", grace.as_secs()));
        self.known(id)
    }

    async fn logs(&self, id: &str, options: LogOptions) -> Result<LogHandle, RegistryError> {
        self.record(format!("logs {id} tail={}", options.tail));
        self.known(id)?;
        self.log_options.lock().unwrap().push(options);

        if let Some(reason) = self.refuse_logs.clone() {
            let refused = async_stream::stream! {
                yield Err::<Bytes, _>(RegistryError::Rejected(reason));
            };
            return Ok(LogHandle::from_stream(id, refused));
        }

        let mut rx = self
            .feeds
            .lock()
            .unwrap()
            .remove(id)
            .unwrap_or_else(|| mpsc::channel(1).1);
        let stream = async_stream::stream! {
            while let Some(chunk) = rx.recv().await {
                yield Ok::<_, RegistryError>(chunk);
            }
        };
        Ok(LogHandle::from_stream(id, stream))
    }
}

/// Runner fake replaying scripted outputs; unscripted calls succeed empty.
#[derive(Default)]
pub struct FakeRunner {
    outputs: Mutex<VecDeque<CommandOutput>>,
    pub calls: Mutex<Vec<CommandSpec>>,
}

impl FakeRunner {
    pub fn scripted(outputs: Vec<CommandOutput>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(
        &self,
        spec: &CommandSpec,
        _deadline: Duration,
    ) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(spec.clone());
        Ok(self
            .outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| CommandOutput::ok("")))
    }
}

/// A router wired to fakes, plus handles to inspect them.
pub struct TestApp {
    pub router: Router,
    pub registry: Arc<FakeRegistry>,
    pub runner: Arc<FakeRunner>,
    pub shutdown: CancellationToken,
}

impl TestApp {
    pub fn new(root: &Path, registry: FakeRegistry, runner: FakeRunner) -> Self {
        let registry = Arc::new(registry);
        let runner = Arc::new(runner);
        let shutdown = CancellationToken::new();
        let ctx = bootstrap_with(
            &AppConfig::new(root),
            registry.clone(),
            runner.clone(),
            shutdown.clone(),
        );
        Self {
            router: create_router(ctx, &CorsConfig::AllowAll),
            registry,
            runner,
            shutdown,
        }
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send("GET", uri).await
    }

    pub async fn post(&self, uri: &str) -> Response<Body> {
        self.send("POST", uri).await
    }

    async fn send(&self, method: &str, uri: &str) -> Response<Body> {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the standard `{ok:false,error}` body and return the message.
pub async fn error_message(response: Response<Body>, status: StatusCode) -> String {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    json["error"].as_str().unwrap().to_string()
}

pub fn write_project(root: &Path, name: &str, env: bool) {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("docker-compose.yml"), format!("name: {name}\n")).unwrap();
    if env {
        std::fs::write(dir.join(".env"), "TOKEN=abc\n").unwrap();
    }
}
