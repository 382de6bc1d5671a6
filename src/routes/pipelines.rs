//! Pipeline endpoints.
//!
//! - GET /api/v1/projects/{project}/pipelines
//! - GET /api/v1/projects/{project}/pipelines/{id}
//! - GET /api/v1/projects/{project}/pipelines/{id}/runs?top=
//! - GET /api/v1/projects/{project}/pipelines/{id}/runs/{run}
//! - GET /api/v1/projects/{project}/pipelines/{id}/runs/{run}/artifacts
//!
//! `top` caps how many runs are returned; the upstream API has no such limit.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::devops::{client::DEFAULT_TOP, SharedClient};
use crate::error::Result;
use crate::models::{PipelineArtifact, PipelineDefinition, PipelineRun};

const PIPELINES_ROUTE: &str = "/api/v1/projects/{project}/pipelines";

pub fn routes(client: SharedClient) -> Router {
    Router::new()
        .route(PIPELINES_ROUTE, get(list_pipelines))
        .route(&format!("{PIPELINES_ROUTE}/{{id}}"), get(get_pipeline))
        .route(&format!("{PIPELINES_ROUTE}/{{id}}/runs"), get(list_runs))
        .route(&format!("{PIPELINES_ROUTE}/{{id}}/runs/{{run}}"), get(get_run))
        .route(&format!("{PIPELINES_ROUTE}/{{id}}/runs/{{run}}/artifacts"), get(list_artifacts))
        .with_state(client)
}

#[derive(Debug, Deserialize)]
struct RunsQuery {
    #[serde(default = "default_top")]
    top: usize,
}

fn default_top() -> usize {
    DEFAULT_TOP
}

async fn list_pipelines(
    State(client): State<SharedClient>,
    Path(project): Path<String>,
) -> Result<Json<Vec<PipelineDefinition>>> {
    Ok(Json(client.list_pipelines(&project).await?))
}

async fn get_pipeline(
    State(client): State<SharedClient>,
    Path((project, id)): Path<(String, i64)>,
) -> Result<Json<PipelineDefinition>> {
    Ok(Json(client.get_pipeline(&project, id).await?))
}

async fn list_runs(
    State(client): State<SharedClient>,
    Path((project, id)): Path<(String, i64)>,
    Query(query): Query<RunsQuery>,
) -> Result<Json<Vec<PipelineRun>>> {
    Ok(Json(client.list_pipeline_runs(&project, id, query.top).await?))
}

async fn get_run(
    State(client): State<SharedClient>,
    Path((project, id, run)): Path<(String, i64, i64)>,
) -> Result<Json<PipelineRun>> {
    Ok(Json(client.get_pipeline_run(&project, id, run).await?))
}

async fn list_artifacts(
    State(client): State<SharedClient>,
    Path((project, id, run)): Path<(String, i64, i64)>,
) -> Result<Json<Vec<PipelineArtifact>>> {
    Ok(Json(client.list_pipeline_artifacts(&project, id, run).await?))
}
