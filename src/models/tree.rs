//! Git tree DTOs.
//!
//! - `CommitMetadata`: The slice of a commit the resolver needs (its root tree)
//! - `TreeResponse` / `TreeEntryResponse`: Tree listing as Azure DevOps returns it
//! - `TreeEntry` / `TreeListing`: Listing after conversion, tree and blob entries only
//! - `ObjectType`: Closed tree/blob tag

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitMetadata {
    #[serde(default)]
    pub tree_id: Option<String>,
}

impl CommitMetadata {
    /// Returns the root tree id, or `None` when it is missing or blank.
    pub fn tree_id(&self) -> Option<&str> {
        self.tree_id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Tree,
    Blob,
}

impl ObjectType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "tree" => Some(ObjectType::Tree),
            "blob" => Some(ObjectType::Blob),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ObjectType::Tree => "tree",
            ObjectType::Blob => "blob",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/// `GET .../trees/{treeId}` response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeResponse {
    #[serde(default)]
    pub object_id: String,
    #[serde(default)]
    pub tree_entries: Vec<TreeEntryResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeEntryResponse {
    pub object_id: String,
    pub relative_path: String,
    #[serde(default)]
    pub mode: String,
    pub git_object_type: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub object_id: String,
    pub object_type: ObjectType,
    pub content_url: String,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeListing {
    pub tree_id: String,
    pub entries: Vec<TreeEntry>,
}

impl TreeListing {
    /// Converts a wire listing, dropping submodule (`commit`) and other non tree/blob entries.
    pub fn from_response(tree_id: &str, response: TreeResponse) -> Self {
        let entries = response
            .tree_entries
            .into_iter()
            .filter_map(|entry| {
                let object_type = ObjectType::parse(&entry.git_object_type)?;
                Some(TreeEntry {
                    name: entry.relative_path,
                    object_id: entry.object_id,
                    object_type,
                    content_url: entry.url,
                    size: entry.size,
                })
            })
            .collect();

        Self {
            tree_id: tree_id.to_string(),
            entries,
        }
    }

    /// First entry whose name matches `segment` ignoring case.
    pub fn find(&self, segment: &str) -> Option<&TreeEntry> {
        let wanted = segment.to_lowercase();
        self.entries.iter().find(|e| e.name.to_lowercase() == wanted)
    }
}
