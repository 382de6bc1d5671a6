use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::devops::client::encode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommit {
    pub commit_id: String,
    #[serde(default)]
    pub tree_id: Option<String>,
    #[serde(default)]
    pub author: Option<GitUserDate>,
    #[serde(default)]
    pub committer: Option<GitUserDate>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub change_counts: Option<HashMap<String, u32>>,
    #[serde(default, skip_deserializing)]
    pub relative_time: String,
}

impl GitCommit {
    /// Fills `relative_time` from the committer date, falling back to the author date.
    pub fn with_relative_time(mut self) -> Self {
        let date = self
            .committer
            .as_ref()
            .or(self.author.as_ref())
            .and_then(|who| who.date);
        if let Some(date) = date {
            self.relative_time = format_relative_time(date.timestamp());
        }
        self
    }

    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitUserDate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// `GET .../commits/{commitId}/changes` response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeListResponse {
    #[serde(default)]
    pub change_counts: HashMap<String, u32>,
    #[serde(default)]
    pub changes: Vec<GitChange>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitChange {
    pub change_type: String,
    #[serde(default)]
    pub item: Option<GitItem>,
    /// Previous path of a renamed item.
    #[serde(default)]
    pub original_path: Option<String>,
    #[serde(default)]
    pub source_server_item: Option<String>,
    #[serde(default, skip_deserializing)]
    pub diff_url: Option<String>,
}

impl GitChange {
    /// Path of the item in the parent commit. Differs from the item path for renames.
    pub fn previous_path(&self) -> Option<&str> {
        self.original_path
            .as_deref()
            .or(self.source_server_item.as_deref())
            .filter(|p| !p.trim().is_empty())
            .or(self.item.as_ref().map(|item| item.path.as_str()))
    }

    pub fn is_add(&self) -> bool {
        self.change_type.split(',').any(|t| t.trim().eq_ignore_ascii_case("add"))
    }

    pub fn is_delete(&self) -> bool {
        self.change_type.split(',').any(|t| t.trim().eq_ignore_ascii_case("delete"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitItem {
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub original_object_id: Option<String>,
    #[serde(default)]
    pub git_object_type: Option<String>,
    #[serde(default)]
    pub commit_id: Option<String>,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub is_folder: bool,
}

impl GitItem {
    pub fn is_blob(&self) -> bool {
        !self.is_folder && self.git_object_type.as_deref().is_none_or(|t| t == "blob")
    }

    /// Web compare page for this item, available only when both sides of the change are known.
    pub fn diff_url(&self, base_url: &str, organization: &str, project: &str, repository: &str) -> Option<String> {
        let original = self.original_object_id.as_deref().filter(|s| !s.is_empty())?;
        let current = self.object_id.as_deref().filter(|s| !s.is_empty())?;
        Some(format!(
            "{}/{}/{}/_git/{}?path={}&version=GC{}&version=GC{}",
            base_url.trim_end_matches('/'),
            encode(organization),
            encode(project),
            encode(repository),
            encode(&self.path),
            encode(original),
            encode(current),
        ))
    }
}

pub fn format_relative_time(timestamp: i64) -> String {
    let now = Utc::now().timestamp();
    let diff = now - timestamp;

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff < 2592000 {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else if diff < 31536000 {
        let months = diff / 2592000;
        format!("{} month{} ago", months, if months == 1 { "" } else { "s" })
    } else {
        let years = diff / 31536000;
        format!("{} year{} ago", years, if years == 1 { "" } else { "s" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_url_requires_both_object_ids() {
        let mut item = GitItem {
            object_id: Some("new1".into()),
            original_object_id: Some("old1".into()),
            path: "/src/main file.rs".into(),
            ..Default::default()
        };
        assert_eq!(
            item.diff_url("https://dev.azure.com/", "contoso", "My Project", "web").as_deref(),
            Some("https://dev.azure.com/contoso/My%20Project/_git/web?path=%2Fsrc%2Fmain%20file.rs&version=GCold1&version=GCnew1")
        );

        item.original_object_id = None;
        assert_eq!(item.diff_url("https://dev.azure.com", "contoso", "p", "r"), None);
    }

    #[test]
    fn diff_url_escapes_organization() {
        let item = GitItem {
            object_id: Some("new1".into()),
            original_object_id: Some("old1".into()),
            path: "/a.txt".into(),
            ..Default::default()
        };
        let url = item.diff_url("https://devops.example.com/tfs", "Contoso Ltd/EU", "web", "site").unwrap();
        assert!(url.starts_with("https://devops.example.com/tfs/Contoso%20Ltd%2FEU/web/_git/site?"), "{url}");
    }

    #[test]
    fn change_type_flags_handle_combined_types() {
        let change = GitChange {
            change_type: "edit, rename".into(),
            ..Default::default()
        };
        assert!(!change.is_add());
        assert!(!change.is_delete());

        let change = GitChange {
            change_type: "delete".into(),
            ..Default::default()
        };
        assert!(change.is_delete());
    }

    #[test]
    fn renamed_change_reports_its_previous_path() {
        let change: GitChange = serde_json::from_str(
            r#"{
                "changeType": "rename",
                "item": {"objectId": "b1", "gitObjectType": "blob", "path": "/docs/guide.md"},
                "originalPath": "/guide.md"
            }"#,
        )
        .unwrap();
        assert_eq!(change.previous_path(), Some("/guide.md"));

        let change: GitChange = serde_json::from_str(
            r#"{"changeType": "rename", "item": {"path": "/b.txt"}, "sourceServerItem": "/a.txt"}"#,
        )
        .unwrap();
        assert_eq!(change.previous_path(), Some("/a.txt"));

        let change: GitChange = serde_json::from_str(r#"{"changeType": "edit", "item": {"path": "/b.txt"}}"#).unwrap();
        assert_eq!(change.previous_path(), Some("/b.txt"));
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc::now().timestamp();
        assert_eq!(format_relative_time(now), "just now");
        assert_eq!(format_relative_time(now - 120), "2 minutes ago");
        assert_eq!(format_relative_time(now - 3600), "1 hour ago");
        assert_eq!(format_relative_time(now - 3 * 86400), "3 days ago");
    }

    #[test]
    fn commit_deserializes_from_api_shape() {
        let commit = serde_json::from_str::<GitCommit>(
            r#"{
                "commitId": "c1",
                "treeId": "t0",
                "author": {"name": "Ada", "email": "ada@example.com", "date": "2024-01-02T03:04:05Z"},
                "committer": {"name": "Ada", "email": "ada@example.com", "date": "2024-01-02T03:04:05Z"},
                "comment": "Initial import",
                "parents": ["p1"],
                "url": "https://dev.azure.com/x/_apis/git/repositories/r/commits/c1"
            }"#,
        )
        .unwrap()
        .with_relative_time();

        assert_eq!(commit.tree_id.as_deref(), Some("t0"));
        assert_eq!(commit.first_parent(), Some("p1"));
        assert!(commit.relative_time.ends_with("ago"));
    }
}
