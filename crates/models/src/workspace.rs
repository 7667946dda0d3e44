use serde::{Deserialize, Serialize};

use crate::ids::ResourceId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceMember {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl WorkspaceMember {
    /// Profile name, then email, then "Unknown". Blank values are skipped.
    pub fn display_name(&self) -> &str {
        [self.user_name.as_deref(), self.user_email.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
            .unwrap_or("Unknown")
    }

    pub fn role_or_default(&self) -> &str {
        self.role.as_deref().unwrap_or("member")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn member_name_falls_back_to_email_then_unknown() {
        let named: WorkspaceMember =
            serde_json::from_value(json!({ "userName": "Ada", "userEmail": "a@x.io" })).unwrap();
        let invited: WorkspaceMember =
            serde_json::from_value(json!({ "userName": null, "userEmail": "b@x.io" })).unwrap();
        let bare: WorkspaceMember = serde_json::from_value(json!({ "userName": "  " })).unwrap();

        assert_eq!(named.display_name(), "Ada");
        assert_eq!(invited.display_name(), "b@x.io");
        assert_eq!(bare.display_name(), "Unknown");
    }
}
