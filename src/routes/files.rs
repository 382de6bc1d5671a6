//! File content endpoints.
//!
//! - GET .../commits/{commit}/file?path=<path>
//!   Content of the file at `path` as of `commit`, as a JSON string. Content
//!   that is not UTF-8 is rejected with 422.
//!
//! - GET .../commits/{commit}/file/raw?path=<path>
//!   The same file's bytes, unchanged, as `application/octet-stream`.
//!
//! Both walk the commit's tree one path segment at a time. A path naming a
//! directory is 404.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::REPO_ROUTE;
use crate::devops::SharedClient;
use crate::error::Result;

pub fn routes(client: SharedClient) -> Router {
    Router::new()
        .route(&format!("{REPO_ROUTE}/commits/{{commit}}/file"), get(get_file_text))
        .route(&format!("{REPO_ROUTE}/commits/{{commit}}/file/raw"), get(get_file_raw))
        .with_state(client)
}

#[derive(Debug, Deserialize)]
struct FileQuery {
    #[serde(default)]
    path: String,
}

async fn get_file_text(
    State(client): State<SharedClient>,
    Path((project, repository, commit)): Path<(String, String, String)>,
    Query(query): Query<FileQuery>,
) -> Result<Json<String>> {
    let repo = client.repo(&project, &repository);
    let content = client.get_file_text(&repo, &commit, &query.path).await?;
    Ok(Json(content))
}

async fn get_file_raw(
    State(client): State<SharedClient>,
    Path((project, repository, commit)): Path<(String, String, String)>,
    Query(query): Query<FileQuery>,
) -> Result<impl IntoResponse> {
    let repo = client.repo(&project, &repository);
    let content = client.get_file_content(&repo, &commit, &query.path).await?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], content))
}
