use serde::{Deserialize, Serialize};

use crate::ids::ResourceId;

pub const DEFAULT_PROJECT_ICON: &str = "📁";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<ResourceId>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Project {
    pub fn icon_or_default(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_PROJECT_ICON)
    }

    /// URL slug derived from a display name: lowercase, spaces become hyphens.
    pub fn slug_from_name(name: &str) -> String {
        name.to_lowercase().replace(' ', "-")
    }
}
