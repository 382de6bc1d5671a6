use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::REPO_ROUTE;
use crate::devops::SharedClient;
use crate::error::Result;
use crate::models::DiffResponse;

pub fn routes(client: SharedClient) -> Router {
    Router::new()
        .route(&format!("{REPO_ROUTE}/diff"), get(get_file_diff))
        .route(&format!("{REPO_ROUTE}/commits/{{commit}}/diff"), get(get_commit_diff))
        .with_state(client)
}

#[derive(Debug, Deserialize)]
struct DiffQuery {
    from: String,
    to: String,
    path: String,
}

async fn get_file_diff(
    State(client): State<SharedClient>,
    Path((project, repository)): Path<(String, String)>,
    Query(query): Query<DiffQuery>,
) -> Result<Json<DiffResponse>> {
    let repo = client.repo(&project, &repository);
    let response = client.diff_file(&repo, &query.from, &query.to, &query.path).await?;
    Ok(Json(response))
}

async fn get_commit_diff(
    State(client): State<SharedClient>,
    Path((project, repository, commit)): Path<(String, String, String)>,
) -> Result<Json<DiffResponse>> {
    let repo = client.repo(&project, &repository);
    Ok(Json(client.diff_commit(&repo, &commit).await?))
}
