//! API route handlers - maps HTTP endpoints to Azure DevOps operations.
//!
//! Each submodule defines routes for a feature area:
//! - `projects`: Project listing and lookup (GET /api/v1/projects)
//! - `repositories`: Repositories of a project
//! - `commits`: Commit history, commit detail and changed files
//! - `files`: File content at a commit, resolved through the commit tree
//! - `diff`: Line diffs of a commit or of one file between two commits
//! - `branches`: Branch listing and lookup
//! - `pull_requests`: Pull request listing with status filter
//! - `pipelines`: Pipeline definitions, runs and run artifacts

pub mod branches;
pub mod commits;
pub mod diff;
pub mod files;
pub mod pipelines;
pub mod projects;
pub mod pull_requests;
pub mod repositories;

use axum::Router;

use crate::devops::SharedClient;

/// Prefix shared by every repository-scoped route.
pub(crate) const REPO_ROUTE: &str = "/api/v1/projects/{project}/repositories/{repository}";

pub fn create_router(client: SharedClient) -> Router {
    Router::new()
        .merge(projects::routes(client.clone()))
        .merge(repositories::routes(client.clone()))
        .merge(commits::routes(client.clone()))
        .merge(files::routes(client.clone()))
        .merge(diff::routes(client.clone()))
        .merge(branches::routes(client.clone()))
        .merge(pull_requests::routes(client.clone()))
        .merge(pipelines::routes(client))
}
