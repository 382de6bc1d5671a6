//! Commit history endpoints.
//!
//! - GET .../commits?branch=&top=
//!   Latest commits, optionally on one branch. `top` defaults to 100.
//!
//! - GET .../commits/{commit}
//!   Single commit with author, committer and parents.
//!
//! - GET .../commits/{commit}/changes
//!   Files the commit touched, each with a compare link when both versions exist.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::REPO_ROUTE;
use crate::devops::{client::DEFAULT_TOP, SharedClient};
use crate::error::Result;
use crate::models::{GitChange, GitCommit};

pub fn routes(client: SharedClient) -> Router {
    Router::new()
        .route(&format!("{REPO_ROUTE}/commits"), get(list_commits))
        .route(&format!("{REPO_ROUTE}/commits/{{commit}}"), get(get_commit))
        .route(&format!("{REPO_ROUTE}/commits/{{commit}}/changes"), get(get_commit_changes))
        .with_state(client)
}

#[derive(Debug, Deserialize)]
struct CommitsQuery {
    branch: Option<String>,
    #[serde(default = "default_top")]
    top: usize,
}

fn default_top() -> usize {
    DEFAULT_TOP
}

async fn list_commits(
    State(client): State<SharedClient>,
    Path((project, repository)): Path<(String, String)>,
    Query(query): Query<CommitsQuery>,
) -> Result<Json<Vec<GitCommit>>> {
    let repo = client.repo(&project, &repository);
    let commits = client.list_commits(&repo, query.branch.as_deref(), query.top).await?;
    Ok(Json(commits))
}

async fn get_commit(
    State(client): State<SharedClient>,
    Path((project, repository, commit)): Path<(String, String, String)>,
) -> Result<Json<GitCommit>> {
    let repo = client.repo(&project, &repository);
    Ok(Json(client.get_commit(&repo, &commit).await?))
}

async fn get_commit_changes(
    State(client): State<SharedClient>,
    Path((project, repository, commit)): Path<(String, String, String)>,
) -> Result<Json<Vec<GitChange>>> {
    let repo = client.repo(&project, &repository);
    Ok(Json(client.get_commit_changes(&repo, &commit).await?))
}
