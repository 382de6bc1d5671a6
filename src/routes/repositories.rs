use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use super::REPO_ROUTE;
use crate::devops::SharedClient;
use crate::error::Result;
use crate::models::GitRepository;

pub fn routes(client: SharedClient) -> Router {
    Router::new()
        .route("/api/v1/projects/{project}/repositories", get(list_repositories))
        .route(REPO_ROUTE, get(get_repository))
        .with_state(client)
}

async fn list_repositories(
    State(client): State<SharedClient>,
    Path(project): Path<String>,
) -> Result<Json<Vec<GitRepository>>> {
    let repositories = client.list_repositories(&project).await?;
    Ok(Json(repositories))
}

async fn get_repository(
    State(client): State<SharedClient>,
    Path((project, repository)): Path<(String, String)>,
) -> Result<Json<GitRepository>> {
    let repo = client.repo(&project, &repository);
    Ok(Json(client.get_repository(&repo).await?))
}
