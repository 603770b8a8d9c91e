//! Compose project handlers - discovery, file reads and actions.

use axum::Json;
use axum::extract::{Path, State};

use moorage_core::{ProjectAction, ProjectFileKind};

use crate::dto::{ProjectActionResponse, ProjectDto, ProjectFileDto};
use crate::error::HttpError;
use crate::state::AppState;

/// List compose projects under the project root.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProjectDto>>, HttpError> {
    let projects = state.projects.discover().await?;
    Ok(Json(projects.into_iter().map(ProjectDto::from).collect()))
}

/// Raw `docker-compose.yml` of one project.
pub async fn compose_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ProjectFileDto>, HttpError> {
    let file = state
        .projects
        .read_file(&name, ProjectFileKind::Compose)
        .await?;
    Ok(Json(file.into()))
}

/// Raw `.env` of one project.
pub async fn env_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ProjectFileDto>, HttpError> {
    let file = state.projects.read_file(&name, ProjectFileKind::Env).await?;
    Ok(Json(file.into()))
}

/// Run `pull`, `up`, `down` or `restart` for one project.
pub async fn action(
    State(state): State<AppState>,
    Path((name, action)): Path<(String, String)>,
) -> Result<Json<ProjectActionResponse>, HttpError> {
    let action: ProjectAction = action.parse()?;
    let report = state.projects.run_action(&name, action).await?;
    Ok(Json(report.into()))
}
