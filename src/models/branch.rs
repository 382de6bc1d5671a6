use serde::{Deserialize, Serialize};

pub const HEADS_PREFIX: &str = "refs/heads/";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    /// Full ref name, e.g. `refs/heads/main`
    pub name: String,
    pub object_id: String,
    #[serde(default)]
    pub creator: Option<IdentityRef>,
    #[serde(default)]
    pub url: String,
}

impl Branch {
    /// Name without the `refs/heads/` prefix.
    pub fn short_name(&self) -> &str {
        self.name.strip_prefix(HEADS_PREFIX).unwrap_or(&self.name)
    }

    /// Matches either the full ref name or the short name, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.short_name().eq_ignore_ascii_case(name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRef {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub unique_name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}
