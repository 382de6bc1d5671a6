//! Branch listing endpoints.
//!
//! - GET .../branches
//!   Lists all branches (refs under `refs/heads/`).
//!
//! - GET .../branches/{*branch}
//!   Single branch by short or full ref name. Names may contain slashes.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use super::REPO_ROUTE;
use crate::devops::SharedClient;
use crate::error::Result;
use crate::models::Branch;

pub fn routes(client: SharedClient) -> Router {
    Router::new()
        .route(&format!("{REPO_ROUTE}/branches"), get(list_branches))
        .route(&format!("{REPO_ROUTE}/branches/{{*branch}}"), get(get_branch))
        .with_state(client)
}

async fn list_branches(
    State(client): State<SharedClient>,
    Path((project, repository)): Path<(String, String)>,
) -> Result<Json<Vec<Branch>>> {
    let repo = client.repo(&project, &repository);
    let branches = client.list_branches(&repo).await?;
    Ok(Json(branches))
}

async fn get_branch(
    State(client): State<SharedClient>,
    Path((project, repository, branch)): Path<(String, String, String)>,
) -> Result<Json<Branch>> {
    let repo = client.repo(&project, &repository);
    Ok(Json(client.get_branch(&repo, &branch).await?))
}
