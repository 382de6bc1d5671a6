//! Commit-tree file content resolution.
//!
//! Resolves `(commit, path)` to file content by walking the commit's tree one
//! path segment per listing fetch: commit metadata, then a listing for every
//! directory on the way down, then the blob content. Content is returned as the
//! raw bytes the blob URL served. Nothing is cached between calls, so every
//! resolution re-fetches from the root tree.

use super::{GitObjectSource, RepoRef};
use crate::error::{require_non_blank, AppError, Result};
use crate::models::ObjectType;

pub struct TreeFileResolver<'a, S: ?Sized> {
    source: &'a S,
}

/// Non-empty `/`-separated segments, root first.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

impl<'a, S: GitObjectSource + ?Sized> TreeFileResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    pub async fn resolve_file_content(&self, repo: &RepoRef, commit_id: &str, path: &str) -> Result<Vec<u8>> {
        repo.validate()?;
        require_non_blank(commit_id, "Commit ID")?;

        let commit = self.source.fetch_commit_metadata(repo, commit_id).await?;
        let mut tree_id = commit
            .tree_id()
            .ok_or_else(|| AppError::InvalidCommitMetadata(commit_id.to_string()))?
            .to_string();

        let segments = path_segments(path);
        if segments.is_empty() {
            return Err(AppError::NotFound(format!(
                "no file path given for commit '{}'",
                commit_id
            )));
        }

        let last = segments.len() - 1;
        for (index, segment) in segments.iter().enumerate() {
            tracing::debug!("Resolving '{}' in tree {} ({}/{})", segment, tree_id, index + 1, segments.len());
            let listing = self.source.fetch_tree_listing(repo, &tree_id).await?;

            let entry = listing.find(segment).ok_or_else(|| {
                AppError::NotFound(format!(
                    "'{}' in path '{}' at commit '{}'",
                    segment, path, commit_id
                ))
            })?;

            match entry.object_type {
                ObjectType::Tree => tree_id = entry.object_id.clone(),
                ObjectType::Blob if index == last => {
                    return self.source.fetch_blob_content(&entry.content_url).await;
                }
                ObjectType::Blob => {
                    return Err(AppError::UnexpectedObjectType {
                        commit_id: commit_id.to_string(),
                        path: path.to_string(),
                        segment: segment.to_string(),
                        found: ObjectType::Blob,
                    });
                }
            }
        }

        Err(AppError::NotFound(format!(
            "'{}' is a directory, not a file, at commit '{}'",
            path, commit_id
        )))
    }
}

impl super::DevOpsClient {
    pub async fn get_file_content(&self, repo: &RepoRef, commit_id: &str, path: &str) -> Result<Vec<u8>> {
        TreeFileResolver::new(self).resolve_file_content(repo, commit_id, path).await
    }

    /// File content as text. Content that is not UTF-8 is rejected, never re-encoded.
    pub async fn get_file_text(&self, repo: &RepoRef, commit_id: &str, path: &str) -> Result<String> {
        let bytes = self.get_file_content(repo, commit_id, path).await?;
        into_text(bytes, commit_id, path)
    }
}

pub(crate) fn into_text(bytes: Vec<u8>, commit_id: &str, path: &str) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| AppError::NotText {
        commit_id: commit_id.to_string(),
        path: path.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::models::{CommitMetadata, TreeEntry, TreeListing};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Fetch {
        Commit(String),
        Tree(String),
        Blob(String),
    }

    /// In-memory object store that records every fetch.
    #[derive(Default)]
    pub struct FakeSource {
        pub commits: HashMap<String, Option<String>>,
        pub trees: HashMap<String, Vec<TreeEntry>>,
        pub blobs: HashMap<String, Vec<u8>>,
        pub failing_trees: Vec<String>,
        pub fetches: Mutex<Vec<Fetch>>,
    }

    impl FakeSource {
        pub fn with_commit(mut self, commit_id: &str, tree_id: Option<&str>) -> Self {
            self.commits.insert(commit_id.into(), tree_id.map(Into::into));
            self
        }

        pub fn with_tree(mut self, tree_id: &str, entries: Vec<TreeEntry>) -> Self {
            self.trees.insert(tree_id.into(), entries);
            self
        }

        pub fn with_blob(self, url: &str, content: &str) -> Self {
            self.with_blob_bytes(url, content.as_bytes())
        }

        pub fn with_blob_bytes(mut self, url: &str, content: &[u8]) -> Self {
            self.blobs.insert(url.into(), content.to_vec());
            self
        }

        pub fn fetches(&self) -> Vec<Fetch> {
            self.fetches.lock().unwrap().clone()
        }

        fn record(&self, fetch: Fetch) {
            self.fetches.lock().unwrap().push(fetch);
        }
    }

    pub fn tree(name: &str, object_id: &str) -> TreeEntry {
        TreeEntry {
            name: name.into(),
            object_id: object_id.into(),
            object_type: ObjectType::Tree,
            content_url: String::new(),
            size: 0,
        }
    }

    pub fn blob(name: &str, url: &str) -> TreeEntry {
        TreeEntry {
            name: name.into(),
            object_id: format!("obj-{}", name),
            object_type: ObjectType::Blob,
            content_url: url.into(),
            size: 1,
        }
    }

    #[async_trait]
    impl GitObjectSource for FakeSource {
        async fn fetch_commit_metadata(&self, _repo: &RepoRef, commit_id: &str) -> Result<CommitMetadata> {
            self.record(Fetch::Commit(commit_id.into()));
            match self.commits.get(commit_id) {
                Some(tree_id) => Ok(CommitMetadata { tree_id: tree_id.clone() }),
                None => Err(AppError::upstream(format!("commit '{}' metadata", commit_id), Some(404), "Not Found")),
            }
        }

        async fn fetch_tree_listing(&self, _repo: &RepoRef, tree_id: &str) -> Result<TreeListing> {
            self.record(Fetch::Tree(tree_id.into()));
            if self.failing_trees.iter().any(|t| t == tree_id) {
                return Err(AppError::upstream(format!("tree '{}'", tree_id), Some(500), "Internal Server Error"));
            }
            let entries = self.trees.get(tree_id).cloned().unwrap_or_default();
            Ok(TreeListing {
                tree_id: tree_id.into(),
                entries,
            })
        }

        async fn fetch_blob_content(&self, content_url: &str) -> Result<Vec<u8>> {
            self.record(Fetch::Blob(content_url.into()));
            self.blobs
                .get(content_url)
                .cloned()
                .ok_or_else(|| AppError::upstream(content_url, Some(404), "Not Found"))
        }
    }

    pub fn repo() -> RepoRef {
        RepoRef {
            organization: "contoso".into(),
            project: "web".into(),
            repository: "site".into(),
        }
    }

    /// c1 -> t0 { src/ -> t1 { main.txt }, README.md }
    pub fn sample() -> FakeSource {
        FakeSource::default()
            .with_commit("c1", Some("t0"))
            .with_tree("t0", vec![tree("src", "t1"), blob("README.md", "U-readme")])
            .with_tree("t1", vec![blob("main.txt", "U")])
            .with_blob("U", "fn main() {}\n")
            .with_blob("U-readme", "# Site\n")
    }

    #[tokio::test]
    async fn resolves_nested_file() {
        let source = sample();
        let content = TreeFileResolver::new(&source)
            .resolve_file_content(&repo(), "c1", "src/main.txt")
            .await
            .unwrap();

        assert_eq!(content, b"fn main() {}\n");
        assert_eq!(
            source.fetches(),
            vec![
                Fetch::Commit("c1".into()),
                Fetch::Tree("t0".into()),
                Fetch::Tree("t1".into()),
                Fetch::Blob("U".into()),
            ]
        );
    }

    #[tokio::test]
    async fn resolves_file_at_root() {
        let source = sample();
        let content = TreeFileResolver::new(&source)
            .resolve_file_content(&repo(), "c1", "README.md")
            .await
            .unwrap();
        assert_eq!(content, b"# Site\n");
        assert_eq!(source.fetches().len(), 3);
    }

    #[rstest]
    #[case("src/main.txt")]
    #[case("SRC/Main.TXT")]
    #[case("/src//main.txt/")]
    #[tokio::test]
    async fn matching_ignores_case_and_empty_segments(#[case] path: &str) {
        let source = sample();
        let content = TreeFileResolver::new(&source)
            .resolve_file_content(&repo(), "c1", path)
            .await
            .unwrap();
        assert_eq!(content, b"fn main() {}\n");
    }

    #[tokio::test]
    async fn directory_path_is_not_found() {
        let source = sample();
        let err = TreeFileResolver::new(&source)
            .resolve_file_content(&repo(), "c1", "src")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref msg) if msg.contains("directory")), "{err}");
        assert_eq!(source.fetches(), vec![Fetch::Commit("c1".into()), Fetch::Tree("t0".into())]);
    }

    #[tokio::test]
    async fn missing_segment_stops_after_its_listing() {
        let source = sample();
        let err = TreeFileResolver::new(&source)
            .resolve_file_content(&repo(), "c1", "missing/main.txt")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref msg) if msg.contains("'missing'") && msg.contains("missing/main.txt")));
        assert_eq!(source.fetches(), vec![Fetch::Commit("c1".into()), Fetch::Tree("t0".into())]);
    }

    #[tokio::test]
    async fn blob_before_last_segment_is_unexpected() {
        let source = sample();
        let err = TreeFileResolver::new(&source)
            .resolve_file_content(&repo(), "c1", "README.md/inner.txt")
            .await
            .unwrap_err();

        match err {
            AppError::UnexpectedObjectType { segment, found, .. } => {
                assert_eq!(segment, "README.md");
                assert_eq!(found, ObjectType::Blob);
            }
            other => panic!("expected UnexpectedObjectType, got {other:?}"),
        }
        assert_eq!(source.fetches(), vec![Fetch::Commit("c1".into()), Fetch::Tree("t0".into())]);
    }

    #[rstest]
    #[case("")]
    #[case("/")]
    #[case("///")]
    #[tokio::test]
    async fn empty_path_only_fetches_commit(#[case] path: &str) {
        let source = sample();
        let err = TreeFileResolver::new(&source)
            .resolve_file_content(&repo(), "c1", path)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(source.fetches(), vec![Fetch::Commit("c1".into())]);
    }

    #[tokio::test]
    async fn commit_without_tree_is_invalid_metadata() {
        let source = FakeSource::default().with_commit("c2", None).with_commit("c3", Some(""));
        let resolver = TreeFileResolver::new(&source);

        let err = resolver.resolve_file_content(&repo(), "c2", "a.txt").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCommitMetadata(ref id) if id == "c2"));

        let err = resolver.resolve_file_content(&repo(), "c3", "a.txt").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCommitMetadata(_)));
    }

    #[tokio::test]
    async fn upstream_failures_propagate() {
        let source = sample();
        let err = TreeFileResolver::new(&source)
            .resolve_file_content(&repo(), "nope", "src/main.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable { status: Some(404), .. }));

        let mut source = sample();
        source.failing_trees.push("t1".into());
        let err = TreeFileResolver::new(&source)
            .resolve_file_content(&repo(), "c1", "src/main.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable { status: Some(500), .. }));
        assert_eq!(source.fetches().last(), Some(&Fetch::Tree("t1".into())));
    }

    #[tokio::test]
    async fn failed_blob_fetch_returns_no_content() {
        let source = FakeSource::default()
            .with_commit("c1", Some("t0"))
            .with_tree("t0", vec![blob("gone.txt", "U-gone")]);

        let result = TreeFileResolver::new(&source)
            .resolve_file_content(&repo(), "c1", "gone.txt")
            .await;

        match result {
            Err(AppError::UpstreamUnavailable { what, status, .. }) => {
                assert_eq!(what, "U-gone");
                assert_eq!(status, Some(404));
            }
            other => panic!("expected UpstreamUnavailable, got {other:?}"),
        }
        assert_eq!(
            source.fetches(),
            vec![Fetch::Commit("c1".into()), Fetch::Tree("t0".into()), Fetch::Blob("U-gone".into())]
        );
    }

    #[tokio::test]
    async fn non_utf8_content_is_returned_unchanged() {
        let latin1 = [0x63, 0x61, 0x66, 0xE9, 0x0A];
        let source = FakeSource::default()
            .with_commit("c1", Some("t0"))
            .with_tree("t0", vec![blob("cafe.txt", "U-cafe")])
            .with_blob_bytes("U-cafe", &latin1);

        let content = TreeFileResolver::new(&source)
            .resolve_file_content(&repo(), "c1", "cafe.txt")
            .await
            .unwrap();
        assert_eq!(content, latin1.to_vec());

        let err = into_text(content, "c1", "cafe.txt").unwrap_err();
        assert!(matches!(err, AppError::NotText { ref path, .. } if path == "cafe.txt"));
        assert_eq!(into_text(b"caf\xc3\xa9\n".to_vec(), "c1", "cafe.txt").unwrap(), "café\n");
    }

    #[tokio::test]
    async fn first_case_insensitive_match_wins() {
        let source = FakeSource::default()
            .with_commit("c1", Some("t0"))
            .with_tree("t0", vec![blob("Notes.txt", "first"), blob("notes.txt", "second")])
            .with_blob("first", "one")
            .with_blob("second", "two");

        let content = TreeFileResolver::new(&source)
            .resolve_file_content(&repo(), "c1", "notes.txt")
            .await
            .unwrap();
        assert_eq!(content, b"one");
    }

    #[tokio::test]
    async fn blank_identifiers_fail_without_fetching() {
        let source = sample();
        let resolver = TreeFileResolver::new(&source);

        let mut bad = repo();
        bad.project = " ".into();
        let err = resolver.resolve_file_content(&bad, "c1", "src/main.txt").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));

        let err = resolver.resolve_file_content(&repo(), "", "src/main.txt").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));

        assert!(source.fetches().is_empty());
    }

    #[test]
    fn segments_drop_empty_parts() {
        assert_eq!(path_segments("/a//b/c/"), vec!["a", "b", "c"]);
        assert!(path_segments("").is_empty());
    }
}
