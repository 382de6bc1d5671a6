use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::devops::SharedClient;
use crate::error::Result;
use crate::models::Project;

pub fn routes(client: SharedClient) -> Router {
    Router::new()
        .route("/api/v1/projects", get(list_projects))
        .route("/api/v1/projects/{project}", get(get_project))
        .with_state(client)
}

async fn list_projects(State(client): State<SharedClient>) -> Result<Json<Vec<Project>>> {
    let projects = client.list_projects().await?;
    Ok(Json(projects))
}

async fn get_project(
    State(client): State<SharedClient>,
    Path(project): Path<String>,
) -> Result<Json<Project>> {
    let project = client.get_project(&project).await?;
    Ok(Json(project))
}
