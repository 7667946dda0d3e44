use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};
use strum::VariantNames;

use crate::error::ToolError;

pub const ACTION_KEY: &str = "action";
pub const API_URL_KEY: &str = "api_url";

/// Flat named arguments of one tool call.
///
/// Values may be strings, numbers, booleans or null. Null and a missing key
/// are the same thing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ToolArgs(Map<String, Value>);

impl ToolArgs {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Scalar value as text, null and absent as `None`. Empty strings are kept.
    pub fn present_text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Like [`present_text`](Self::present_text) but an empty string counts as missing.
    pub fn text(&self, key: &str) -> Option<String> {
        self.present_text(key).filter(|text| !text.is_empty())
    }

    pub fn is_present(&self, key: &str) -> bool {
        self.present_text(key).is_some()
    }

    pub fn required(&self, key: &str) -> Result<String, ToolError> {
        self.text(key)
            .ok_or_else(|| ToolError::Validation(format!("'{key}' parameter is required")))
    }

    pub fn required_for(&self, key: &str, purpose: &str) -> Result<String, ToolError> {
        self.text(key).ok_or_else(|| {
            ToolError::Validation(format!("'{key}' parameter is required for {purpose}"))
        })
    }

    /// Both keys must be non-empty; the error names the pair together.
    pub fn required_pair(
        &self,
        first: &str,
        second: &str,
        purpose: Option<&str>,
    ) -> Result<(String, String), ToolError> {
        match (self.text(first), self.text(second)) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => {
                let suffix = purpose.map(|p| format!(" for {p}")).unwrap_or_default();
                Err(ToolError::Validation(format!(
                    "Both '{first}' and '{second}' parameters are required{suffix}"
                )))
            }
        }
    }

    /// Integer from a JSON number or a numeric string.
    pub fn integer(&self, key: &str) -> Result<Option<i64>, ToolError> {
        let invalid = || ToolError::Validation(format!("'{key}' must be an integer"));
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(number)) => number
                .as_i64()
                .or_else(|| {
                    number
                        .as_f64()
                        .filter(|value| value.fract() == 0.0)
                        .filter(|value| *value >= i64::MIN as f64 && *value < i64::MAX as f64)
                        .map(|value| value as i64)
                })
                .map(Some)
                .ok_or_else(invalid),
            Some(Value::String(text)) => text.trim().parse::<i64>().map(Some).map_err(|_| invalid()),
            Some(_) => Err(invalid()),
        }
    }

    pub fn api_url(&self) -> Option<String> {
        self.text(API_URL_KEY)
    }

    /// Resolves the `action` argument against an action enum.
    pub fn action<A>(&self) -> Result<A, ToolError>
    where
        A: FromStr + VariantNames,
    {
        let action = self.text(ACTION_KEY).ok_or(ToolError::MissingAction)?;
        A::from_str(&action).map_err(|_| ToolError::UnknownAction {
            action,
            available: A::VARIANTS,
        })
    }
}

impl From<Map<String, Value>> for ToolArgs {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Value> for ToolArgs {
    /// Non-object values carry no named arguments.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use strum_macros::{EnumString, VariantNames};

    use super::*;

    #[derive(Debug, PartialEq, EnumString, VariantNames)]
    #[strum(serialize_all = "snake_case")]
    enum Sample {
        List,
        GetMembers,
    }

    #[test]
    fn null_and_empty_values_count_as_missing() {
        let args = ToolArgs::from(json!({ "name": "", "description": null, "id": 12 }));
        assert_eq!(args.text("name"), None);
        assert_eq!(args.present_text("name"), Some(String::new()));
        assert!(!args.is_present("description"));
        assert_eq!(args.text("id"), Some("12".to_string()));
    }

    #[test]
    fn required_pair_names_both_fields() {
        let args = ToolArgs::from(json!({ "task_id": "t1" }));
        let err = args.required_pair("task_id", "url", None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: Both 'task_id' and 'url' parameters are required"
        );
    }

    #[test]
    fn integer_accepts_numbers_and_numeric_strings() {
        let args = ToolArgs::from(json!({ "a": 3, "b": " 4 ", "c": 2.0, "d": "x", "e": 1.5 }));
        assert_eq!(args.integer("a").unwrap(), Some(3));
        assert_eq!(args.integer("b").unwrap(), Some(4));
        assert_eq!(args.integer("c").unwrap(), Some(2));
        assert_eq!(args.integer("missing").unwrap(), None);
        assert!(args.integer("d").is_err());
        assert!(args.integer("e").is_err());
    }

    #[test]
    fn integer_rejects_floats_outside_i64() {
        let args = ToolArgs::from(json!({ "huge": 1e20, "tiny": -1e20, "big": 9.0e15 }));
        let err = args.integer("huge").unwrap_err();
        assert_eq!(err.to_string(), "Error: 'huge' must be an integer");
        assert!(args.integer("tiny").is_err());
        assert_eq!(args.integer("big").unwrap(), Some(9_000_000_000_000_000));
    }

    #[test]
    fn action_resolution_reports_available_actions() {
        let args = ToolArgs::from(json!({ "action": "get_members" }));
        assert_eq!(args.action::<Sample>().unwrap(), Sample::GetMembers);

        let err = ToolArgs::from(json!({ "action": "frobnicate" }))
            .action::<Sample>()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: Unknown action 'frobnicate'. Available actions: list, get_members"
        );

        let err = ToolArgs::default().action::<Sample>().unwrap_err();
        assert!(matches!(err, ToolError::MissingAction));
    }
}
