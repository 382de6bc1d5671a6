//! Azure DevOps viewer - browse projects, repositories, commits, diffs, branches,
//! pull requests and pipelines of an Azure DevOps organization through a local
//! JSON API.

pub mod devops;
pub mod error;
pub mod models;
pub mod routes;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use devops::SharedClient;

/// Full application router: API routes plus CORS and request tracing.
pub fn app(client: SharedClient) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::create_router(client))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
