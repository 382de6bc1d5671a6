//! Azure DevOps REST client.
//!
//! One typed method per REST operation. Every call follows the same shape:
//! validate identifiers, build the URL, GET with Basic auth and the pinned
//! `api-version`, turn a transport error or non-success status into
//! `AppError::UpstreamUnavailable` (logging the upstream body), deserialize.
//! List calls unwrap the `value` array of the response envelope.

use std::time::Duration;

use percent_encoding::utf8_percent_encode;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::{API_VERSION, DEFAULT_API_URL, PATH_SEGMENT};
use crate::error::{require_non_blank, require_positive, AppError, Result};
use crate::models::{
    Branch, ChangeListResponse, GitChange, GitCommit, GitRepository, ListEnvelope, PipelineArtifact,
    PipelineDefinition, PipelineRun, Project, PullRequest, HEADS_PREFIX,
};

pub const DEFAULT_TOP: usize = 100;

#[derive(Clone)]
pub struct ClientConfig {
    pub organization: String,
    pub personal_access_token: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(organization: impl Into<String>, personal_access_token: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            personal_access_token: personal_access_token.into(),
            base_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }
}

/// Organization, project and repository a git operation is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub organization: String,
    pub project: String,
    pub repository: String,
}

impl RepoRef {
    pub fn validate(&self) -> Result<()> {
        require_non_blank(&self.organization, "Organization")?;
        require_non_blank(&self.project, "Project identifier")?;
        require_non_blank(&self.repository, "Repository ID")
    }
}

pub struct DevOpsClient {
    http: Client,
    base_url: String,
    organization: String,
    personal_access_token: String,
}

pub(crate) fn encode(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

impl DevOpsClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        require_non_blank(&config.organization, "Organization")?;
        require_non_blank(&config.personal_access_token, "Personal access token")?;

        let mut builder = Client::builder().user_agent(concat!("devops-viewer/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            organization: config.organization,
            personal_access_token: config.personal_access_token,
        })
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn repo(&self, project: &str, repository: &str) -> RepoRef {
        RepoRef {
            organization: self.organization.clone(),
            project: project.to_string(),
            repository: repository.to_string(),
        }
    }

    fn org_url(&self) -> String {
        format!("{}/{}", self.base_url, encode(&self.organization))
    }

    fn project_url(&self, project: &str) -> String {
        format!("{}/{}/_apis", self.org_url(), encode(project))
    }

    pub(crate) fn repo_url(&self, repo: &RepoRef) -> String {
        format!(
            "{}/{}/{}/_apis/git/repositories/{}",
            self.base_url,
            encode(&repo.organization),
            encode(&repo.project),
            encode(&repo.repository)
        )
    }

    /// PAT goes in the password half of Basic auth with an empty user name.
    pub(crate) fn request(&self, url: &str) -> RequestBuilder {
        self.http.get(url).basic_auth("", Some(&self.personal_access_token))
    }

    pub(crate) async fn send(&self, what: &str, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Failed to retrieve {}: {}", what, e);
            AppError::upstream(what, None, e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            tracing::error!("Failed to retrieve {}. Status Code: {}, Details: {}", what, status, details);
            let reason = status.canonical_reason().unwrap_or("unexpected status").to_string();
            return Err(AppError::upstream(what, Some(status.as_u16()), reason));
        }

        Ok(response)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        what: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        tracing::debug!("GET {} ({})", url, what);
        let request = self.request(url).query(&[("api-version", API_VERSION)]).query(query);
        let response = self.send(what, request).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to decode {}: {}", what, e);
            AppError::upstream(what, None, format!("invalid response body: {}", e))
        })
    }

    async fn get_list<T: DeserializeOwned>(&self, what: &str, url: &str, query: &[(&str, String)]) -> Result<Vec<T>> {
        let envelope: ListEnvelope<T> = self.get_json(what, url, query).await?;
        Ok(envelope.value)
    }

    // Projects

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let url = format!("{}/_apis/projects", self.org_url());
        self.get_list("projects", &url, &[]).await
    }

    pub async fn get_project(&self, project: &str) -> Result<Project> {
        require_non_blank(project, "Project identifier")?;
        let url = format!("{}/_apis/projects/{}", self.org_url(), encode(project));
        self.get_json(&format!("project '{}'", project), &url, &[]).await
    }

    // Git - Repositories

    pub async fn list_repositories(&self, project: &str) -> Result<Vec<GitRepository>> {
        require_non_blank(project, "Project identifier")?;
        let url = format!("{}/git/repositories", self.project_url(project));
        self.get_list(&format!("repositories for project '{}'", project), &url, &[]).await
    }

    pub async fn get_repository(&self, repo: &RepoRef) -> Result<GitRepository> {
        repo.validate()?;
        let url = self.repo_url(repo);
        self.get_json(&format!("repository '{}'", repo.repository), &url, &[]).await
    }

    // Git - Pull Requests

    pub async fn list_pull_requests(&self, repo: &RepoRef, status: Option<&str>) -> Result<Vec<PullRequest>> {
        repo.validate()?;
        let url = format!("{}/pullrequests", self.repo_url(repo));
        let mut query = Vec::new();
        if let Some(status) = status.filter(|s| !s.trim().is_empty()) {
            query.push(("searchCriteria.status", status.to_string()));
        }
        self.get_list("pull requests", &url, &query).await
    }

    pub async fn get_pull_request(&self, repo: &RepoRef, pull_request_id: i64) -> Result<PullRequest> {
        repo.validate()?;
        require_positive(pull_request_id, "Pull request ID")?;
        let url = format!("{}/pullrequests/{}", self.repo_url(repo), pull_request_id);
        self.get_json(&format!("pull request '{}'", pull_request_id), &url, &[]).await
    }

    // Git - Commits

    pub async fn list_commits(&self, repo: &RepoRef, branch: Option<&str>, top: usize) -> Result<Vec<GitCommit>> {
        repo.validate()?;
        let url = format!("{}/commits", self.repo_url(repo));
        let mut query = vec![("$top", top.to_string())];
        if let Some(branch) = branch.filter(|b| !b.trim().is_empty()) {
            let branch = branch.strip_prefix(HEADS_PREFIX).unwrap_or(branch);
            query.push(("searchCriteria.itemVersion.version", branch.to_string()));
        }
        let commits: Vec<GitCommit> = self.get_list("commits", &url, &query).await?;
        Ok(commits.into_iter().map(GitCommit::with_relative_time).collect())
    }

    pub async fn get_commit(&self, repo: &RepoRef, commit_id: &str) -> Result<GitCommit> {
        repo.validate()?;
        require_non_blank(commit_id, "Commit ID")?;
        let url = format!("{}/commits/{}", self.repo_url(repo), encode(commit_id));
        let commit: GitCommit = self.get_json(&format!("commit '{}'", commit_id), &url, &[]).await?;
        Ok(commit.with_relative_time())
    }

    /// Changes introduced by a commit, each with a web compare link when both sides exist.
    pub async fn get_commit_changes(&self, repo: &RepoRef, commit_id: &str) -> Result<Vec<GitChange>> {
        repo.validate()?;
        require_non_blank(commit_id, "Commit ID")?;
        let url = format!("{}/commits/{}/changes", self.repo_url(repo), encode(commit_id));
        let response: ChangeListResponse = self
            .get_json(&format!("changes for commit '{}'", commit_id), &url, &[])
            .await?;

        Ok(response
            .changes
            .into_iter()
            .map(|mut change| {
                change.diff_url = change.item.as_ref().and_then(|item| {
                    item.diff_url(&self.base_url, &repo.organization, &repo.project, &repo.repository)
                });
                change
            })
            .collect())
    }

    // Git - Branches

    pub async fn list_branches(&self, repo: &RepoRef) -> Result<Vec<Branch>> {
        repo.validate()?;
        let url = format!("{}/refs", self.repo_url(repo));
        self.get_list("branches", &url, &[("filter", "heads/".to_string())]).await
    }

    pub async fn get_branch(&self, repo: &RepoRef, branch_name: &str) -> Result<Branch> {
        repo.validate()?;
        require_non_blank(branch_name, "Branch name")?;
        let short = branch_name.strip_prefix(HEADS_PREFIX).unwrap_or(branch_name);
        let url = format!("{}/refs", self.repo_url(repo));
        let branches: Vec<Branch> = self
            .get_list(
                &format!("branch '{}'", branch_name),
                &url,
                &[("filter", format!("heads/{}", short))],
            )
            .await?;

        // The refs filter is a prefix match, so `main` also returns `main-old`.
        branches
            .into_iter()
            .find(|b| b.matches(branch_name))
            .ok_or_else(|| AppError::NotFound(format!("branch '{}'", branch_name)))
    }

    // Pipelines

    pub async fn list_pipelines(&self, project: &str) -> Result<Vec<PipelineDefinition>> {
        require_non_blank(project, "Project identifier")?;
        let url = format!("{}/pipelines", self.project_url(project));
        self.get_list("pipeline definitions", &url, &[]).await
    }

    pub async fn get_pipeline(&self, project: &str, pipeline_id: i64) -> Result<PipelineDefinition> {
        require_non_blank(project, "Project identifier")?;
        require_positive(pipeline_id, "Pipeline ID")?;
        let url = format!("{}/pipelines/{}", self.project_url(project), pipeline_id);
        self.get_json(&format!("pipeline '{}'", pipeline_id), &url, &[]).await
    }

    pub async fn list_pipeline_runs(&self, project: &str, pipeline_id: i64, top: usize) -> Result<Vec<PipelineRun>> {
        require_non_blank(project, "Project identifier")?;
        require_positive(pipeline_id, "Pipeline ID")?;
        let url = format!("{}/pipelines/{}/runs", self.project_url(project), pipeline_id);
        // The runs endpoint has no server-side limit parameter.
        let mut runs: Vec<PipelineRun> = self
            .get_list(&format!("runs for pipeline '{}'", pipeline_id), &url, &[])
            .await?;
        runs.truncate(top);
        Ok(runs)
    }

    pub async fn get_pipeline_run(&self, project: &str, pipeline_id: i64, run_id: i64) -> Result<PipelineRun> {
        require_non_blank(project, "Project identifier")?;
        require_positive(pipeline_id, "Pipeline ID")?;
        require_positive(run_id, "Run ID")?;
        let url = format!("{}/pipelines/{}/runs/{}", self.project_url(project), pipeline_id, run_id);
        self.get_json(&format!("run '{}' of pipeline '{}'", run_id, pipeline_id), &url, &[])
            .await
    }

    pub async fn list_pipeline_artifacts(
        &self,
        project: &str,
        pipeline_id: i64,
        run_id: i64,
    ) -> Result<Vec<PipelineArtifact>> {
        require_non_blank(project, "Project identifier")?;
        require_positive(pipeline_id, "Pipeline ID")?;
        require_positive(run_id, "Run ID")?;
        let url = format!(
            "{}/pipelines/{}/runs/{}/artifacts",
            self.project_url(project),
            pipeline_id,
            run_id
        );
        self.get_list("pipeline artifacts", &url, &[]).await
    }
}
