use serde::{Deserialize, Serialize};

use crate::ids::ResourceId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: ResourceId,
    pub name: String,
    /// `file` or `url`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Attachment {
    pub fn kind_or_unknown(&self) -> &str {
        self.kind.as_deref().unwrap_or("unknown")
    }

    pub fn is_url(&self) -> bool {
        self.kind.as_deref() == Some("url")
    }

    pub fn size_suffix(&self) -> String {
        size_suffix(self.size)
    }
}

/// A file in the caller's file library, not yet bound to a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl StoredFile {
    pub fn size_suffix(&self) -> String {
        size_suffix(self.size)
    }
}

/// ` (N bytes)`, or nothing for a missing or zero size.
fn size_suffix(size: Option<u64>) -> String {
    match size {
        Some(bytes) if bytes > 0 => format!(" ({bytes} bytes)"),
        _ => String::new(),
    }
}
