use git2::{DiffOptions, Patch};

use super::{DevOpsClient, GitObjectSource, RepoRef, TreeFileResolver};
use crate::error::{require_non_blank, AppError, Result};
use crate::models::{DiffHunk, DiffLine, DiffResponse, DiffStats, DiffStatus, FileDiff, LineType};

const CONTEXT_LINES: u32 = 3;

impl DevOpsClient {
    /// Diff of a single file between two commits.
    pub async fn diff_file(&self, repo: &RepoRef, from_commit: &str, to_commit: &str, path: &str) -> Result<DiffResponse> {
        require_non_blank(from_commit, "From commit")?;
        require_non_blank(to_commit, "To commit")?;
        require_non_blank(path, "Path")?;

        let resolver = TreeFileResolver::new(self);
        let old_content = content_or_absent(&resolver, repo, from_commit, path).await?;
        let new_content = content_or_absent(&resolver, repo, to_commit, path).await?;

        if old_content.is_none() && new_content.is_none() {
            return Err(AppError::NotFound(format!(
                "'{}' exists in neither '{}' nor '{}'",
                path, from_commit, to_commit
            )));
        }

        let file = build_file_diff(path, path, old_content, new_content)?;
        let mut stats = DiffStats::default();
        stats.add(&file);

        Ok(DiffResponse {
            from_commit: Some(from_commit.to_string()),
            to_commit: to_commit.to_string(),
            files: vec![file],
            stats,
        })
    }

    /// Diff of every file a commit changed, against its first parent.
    pub async fn diff_commit(&self, repo: &RepoRef, commit_id: &str) -> Result<DiffResponse> {
        let commit = self.get_commit(repo, commit_id).await?;
        let changes = self.get_commit_changes(repo, commit_id).await?;
        let parent = commit.first_parent().map(str::to_string);

        let resolver = TreeFileResolver::new(self);
        let mut files = Vec::new();
        let mut stats = DiffStats::default();

        for change in &changes {
            let Some(item) = change.item.as_ref().filter(|item| item.is_blob()) else {
                continue;
            };

            let old_path = change.previous_path().unwrap_or(item.path.as_str());
            let old_content = match parent.as_deref() {
                Some(parent) if !change.is_add() => content_or_absent(&resolver, repo, parent, old_path).await?,
                _ => None,
            };
            let new_content = if change.is_delete() {
                None
            } else {
                content_or_absent(&resolver, repo, commit_id, &item.path).await?
            };

            if old_content.is_none() && new_content.is_none() {
                continue;
            }

            let file = build_file_diff(old_path, &item.path, old_content, new_content)?;
            stats.add(&file);
            files.push(file);
        }

        tracing::debug!(
            "Commit {}: {} files, +{} -{}",
            commit_id,
            stats.files_changed,
            stats.insertions,
            stats.deletions
        );

        Ok(DiffResponse {
            from_commit: parent,
            to_commit: commit_id.to_string(),
            files,
            stats,
        })
    }
}

/// File content at a commit, `None` when the path does not exist there.
async fn content_or_absent<S: GitObjectSource + ?Sized>(
    resolver: &TreeFileResolver<'_, S>,
    repo: &RepoRef,
    commit_id: &str,
    path: &str,
) -> Result<Option<Vec<u8>>> {
    match resolver.resolve_file_content(repo, commit_id, path).await {
        Ok(content) => Ok(Some(content)),
        Err(AppError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn is_binary(content: &[u8]) -> bool {
    content.contains(&0) || std::str::from_utf8(content).is_err()
}

/// Line diff of two versions of a file. `None` means the file is absent on that side.
///
/// `old_path` differs from `path` when the file was renamed. Binary content is
/// compared for equality only; neither side's content is returned.
pub fn build_file_diff(
    old_path: &str,
    path: &str,
    old_content: Option<Vec<u8>>,
    new_content: Option<Vec<u8>>,
) -> Result<FileDiff> {
    let is_binary = old_content.as_deref().is_some_and(is_binary) || new_content.as_deref().is_some_and(is_binary);
    let renamed = old_path != path;

    let status = match (&old_content, &new_content) {
        (None, _) => DiffStatus::Added,
        (_, None) => DiffStatus::Deleted,
        _ if renamed => DiffStatus::Renamed,
        (Some(old), Some(new)) if old == new => DiffStatus::Unmodified,
        _ => DiffStatus::Modified,
    };

    let mut hunks = Vec::new();
    let mut insertions = 0;
    let mut deletions = 0;

    if !is_binary && old_content != new_content {
        let mut opts = DiffOptions::new();
        opts.context_lines(CONTEXT_LINES);

        let patch = Patch::from_buffers(
            old_content.as_deref().unwrap_or_default(),
            Some(std::path::Path::new(old_path)),
            new_content.as_deref().unwrap_or_default(),
            Some(std::path::Path::new(path)),
            Some(&mut opts),
        )?;

        for hunk_idx in 0..patch.num_hunks() {
            let (hunk, _) = patch.hunk(hunk_idx)?;
            let mut lines = Vec::new();

            for line_idx in 0..patch.num_lines_in_hunk(hunk_idx)? {
                let line = patch.line_in_hunk(hunk_idx, line_idx)?;

                let line_type = match line.origin() {
                    '+' => {
                        insertions += 1;
                        LineType::Addition
                    }
                    '-' => {
                        deletions += 1;
                        LineType::Deletion
                    }
                    ' ' => LineType::Context,
                    // end-of-file newline markers
                    _ => continue,
                };

                lines.push(DiffLine {
                    line_type,
                    old_lineno: line.old_lineno(),
                    new_lineno: line.new_lineno(),
                    content: String::from_utf8_lossy(line.content()).to_string(),
                });
            }

            hunks.push(DiffHunk {
                old_start: hunk.old_start(),
                old_lines: hunk.old_lines(),
                new_start: hunk.new_start(),
                new_lines: hunk.new_lines(),
                header: String::from_utf8_lossy(hunk.header()).to_string(),
                lines,
            });
        }
    }

    let as_text = |content: Option<Vec<u8>>| {
        if is_binary {
            None
        } else {
            content.and_then(|bytes| String::from_utf8(bytes).ok())
        }
    };

    Ok(FileDiff {
        path: path.to_string(),
        old_path: renamed.then(|| old_path.to_string()),
        status,
        hunks,
        old_content: as_text(old_content),
        new_content: as_text(new_content),
        is_binary,
        insertions,
        deletions,
    })
}
