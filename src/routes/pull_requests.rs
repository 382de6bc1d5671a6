use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::REPO_ROUTE;
use crate::devops::SharedClient;
use crate::error::Result;
use crate::models::PullRequest;

pub fn routes(client: SharedClient) -> Router {
    Router::new()
        .route(&format!("{REPO_ROUTE}/pullrequests"), get(list_pull_requests))
        .route(&format!("{REPO_ROUTE}/pullrequests/{{id}}"), get(get_pull_request))
        .with_state(client)
}

#[derive(Debug, Deserialize)]
struct PullRequestsQuery {
    /// active, completed, abandoned or all
    status: Option<String>,
}

async fn list_pull_requests(
    State(client): State<SharedClient>,
    Path((project, repository)): Path<(String, String)>,
    Query(query): Query<PullRequestsQuery>,
) -> Result<Json<Vec<PullRequest>>> {
    let repo = client.repo(&project, &repository);
    let pull_requests = client.list_pull_requests(&repo, query.status.as_deref()).await?;
    Ok(Json(pull_requests))
}

async fn get_pull_request(
    State(client): State<SharedClient>,
    Path((project, repository, id)): Path<(String, String, i64)>,
) -> Result<Json<PullRequest>> {
    let repo = client.repo(&project, &repository);
    Ok(Json(client.get_pull_request(&repo, id).await?))
}
