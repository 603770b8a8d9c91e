//! Container handlers - listing and lifecycle actions.

use axum::Json;
use axum::extract::{Path, State};

use moorage_core::ContainerAction;

use crate::dto::{ContainerDto, OkResponse};
use crate::error::HttpError;
use crate::state::AppState;

/// List all containers, including stopped ones.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ContainerDto>>, HttpError> {
    let containers = state.containers.list().await?;
    Ok(Json(containers.iter().map(ContainerDto::from).collect()))
}

/// Start, stop or restart a container.
///
/// The action tag is parsed before the registry is touched, so an unknown
/// tag is a 400 with no side effects.
pub async fn action(
    State(state): State<AppState>,
    Path((id, action)): Path<(String, String)>,
) -> Result<Json<OkResponse>, HttpError> {
    let action: ContainerAction = action.parse()?;
    state.containers.perform(&id, action).await?;
    Ok(Json(OkResponse::ok()))
}
