//! Data transfer objects (DTOs) for Azure DevOps resources and API responses.
//!
//! Most structs deserialize straight from the Azure DevOps REST API (camelCase)
//! and are re-serialized unchanged for frontend consumption.
//! - `project`: Project, ProjectReference
//! - `repository`: GitRepository
//! - `commit`: GitCommit, GitChange, GitItem
//! - `tree`: CommitMetadata, TreeListing, TreeEntry, ObjectType
//! - `branch`: Branch, IdentityRef
//! - `pull_request`: PullRequest
//! - `pipeline`: PipelineDefinition, PipelineRun, PipelineArtifact
//! - `diff`: DiffResponse, FileDiff, DiffHunk, DiffLine

pub mod branch;
pub mod commit;
pub mod diff;
pub mod pipeline;
pub mod project;
pub mod pull_request;
pub mod repository;
pub mod tree;

pub use branch::*;
pub use commit::*;
pub use diff::*;
pub use pipeline::*;
pub use project::*;
pub use pull_request::*;
pub use repository::*;
pub use tree::*;

use serde::Deserialize;

/// `{ "count": n, "value": [...] }` wrapper around every Azure DevOps list result.
#[derive(Debug, Deserialize)]
pub struct ListEnvelope<T> {
    #[serde(default)]
    pub count: usize,
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}
