//! Wire types for the HTTP API.
//!
//! Field names are camelCase on the wire. Core types never derive
//! `Serialize` for HTTP directly; every response goes through a DTO here.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use moorage_core::{ActionReport, Container, ProjectFile, ProjectRecord};

/// RFC 3339 with second precision and a `Z` suffix.
pub fn rfc3339(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `GET /api/health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: &'static str,
    pub time: String,
}

impl HealthResponse {
    pub fn now() -> Self {
        Self {
            ok: true,
            version: env!("CARGO_PKG_VERSION"),
            time: rfc3339(&Utc::now()),
        }
    }
}

/// Plain success acknowledgement.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub const fn ok() -> Self {
        Self { ok: true }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDto {
    pub id: String,
    pub name: String,
    pub image: String,
    pub state: String,
    pub status: String,
    pub created: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose_project: Option<String>,
}

impl From<&Container> for ContainerDto {
    fn from(c: &Container) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            image: c.image.clone(),
            state: c.state.clone(),
            status: c.status.clone(),
            created: rfc3339(&c.created),
            compose_project: c.compose_project().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDto {
    pub name: String,
    pub path: String,
    pub has_env: bool,
    pub container_total: usize,
    pub container_run: usize,
    pub container_stop: usize,
}

impl From<ProjectRecord> for ProjectDto {
    fn from(p: ProjectRecord) -> Self {
        Self {
            name: p.name,
            path: p.path.display().to_string(),
            has_env: p.has_env,
            container_total: p.counts.total,
            container_run: p.counts.running,
            container_stop: p.counts.stopped,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectFileDto {
    pub name: String,
    pub path: String,
    pub text: String,
}

impl From<ProjectFile> for ProjectFileDto {
    fn from(f: ProjectFile) -> Self {
        Self {
            name: f.name,
            path: f.path.display().to_string(),
            text: f.text,
        }
    }
}

/// Result of a compose action. `output` is the combined command output.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectActionResponse {
    pub ok: bool,
    pub action: &'static str,
    pub project: String,
    pub output: String,
}

impl From<ActionReport> for ProjectActionResponse {
    fn from(r: ActionReport) -> Self {
        Self {
            ok: true,
            action: r.action,
            project: r.project,
            output: r.output,
        }
    }
}
