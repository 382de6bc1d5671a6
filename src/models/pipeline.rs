//! Pipeline DTOs.
//!
//! - `PipelineDefinition`: A pipeline as listed under a project
//! - `PipelineRun`: One execution of a pipeline
//! - `PipelineArtifact`: Artifact published by a run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDefinition {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub revision: Option<i64>,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRun {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    /// unknown, inProgress, canceling or completed
    #[serde(default)]
    pub state: Option<String>,
    /// succeeded, failed, canceled; absent while the run is in progress
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineArtifact {
    pub name: String,
    #[serde(default)]
    pub signed_content: Option<SignedContent>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedContent {
    pub url: String,
    #[serde(default)]
    pub signature_expires: Option<DateTime<Utc>>,
}
