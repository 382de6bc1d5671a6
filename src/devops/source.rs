use async_trait::async_trait;
use reqwest::header::ACCEPT;

use super::client::{encode, DevOpsClient};
use super::{RepoRef, API_VERSION};
use crate::error::{AppError, Result};
use crate::models::{CommitMetadata, TreeListing, TreeResponse};

/// The three lookups a tree walk is built from.
#[async_trait]
pub trait GitObjectSource: Send + Sync {
    /// Fetch the commit, keeping only what identifies its root tree.
    async fn fetch_commit_metadata(&self, repo: &RepoRef, commit_id: &str) -> Result<CommitMetadata>;

    /// Fetch the direct children of one tree object.
    async fn fetch_tree_listing(&self, repo: &RepoRef, tree_id: &str) -> Result<TreeListing>;

    /// Fetch the raw bytes behind a blob entry's content URL.
    async fn fetch_blob_content(&self, content_url: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl GitObjectSource for DevOpsClient {
    async fn fetch_commit_metadata(&self, repo: &RepoRef, commit_id: &str) -> Result<CommitMetadata> {
        let url = format!("{}/commits/{}", self.repo_url(repo), encode(commit_id));
        self.get_json(&format!("commit '{}' metadata", commit_id), &url, &[]).await
    }

    async fn fetch_tree_listing(&self, repo: &RepoRef, tree_id: &str) -> Result<TreeListing> {
        let url = format!("{}/trees/{}", self.repo_url(repo), encode(tree_id));
        let response: TreeResponse = self
            .get_json(
                &format!("tree structure for treeId '{}'", tree_id),
                &url,
                &[("recursive", "false".to_string())],
            )
            .await?;
        Ok(TreeListing::from_response(tree_id, response))
    }

    async fn fetch_blob_content(&self, content_url: &str) -> Result<Vec<u8>> {
        let what = format!("blob content at '{}'", content_url);
        tracing::debug!("GET {} ({})", content_url, what);

        let mut request = self.request(content_url).header(ACCEPT, "application/octet-stream");
        if !content_url.contains("api-version=") {
            request = request.query(&[("api-version", API_VERSION)]);
        }

        let response = self.send(&what, request).await?;
        let bytes = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read {}: {}", what, e);
            AppError::upstream(what, None, e.to_string())
        })?;
        Ok(bytes.to_vec())
    }
}
