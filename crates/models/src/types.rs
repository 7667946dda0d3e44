use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::VariantNames;
use strum_macros::{AsRefStr, Display, EnumString};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    /// Soft-delete marker. Never accepted from callers.
    Deleted,
}

impl TaskStatus {
    /// Statuses a caller may set.
    pub const ASSIGNABLE: [TaskStatus; 3] =
        [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn parse_assignable(value: &str) -> Option<Self> {
        Self::from_str(value)
            .ok()
            .filter(|status| Self::ASSIGNABLE.contains(status))
    }

    pub fn assignable_names() -> String {
        Self::ASSIGNABLE
            .iter()
            .map(|status| status.as_ref())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Board glyph for a raw status string; unknown values render as TODO.
    pub fn glyph_for(raw: Option<&str>) -> &'static str {
        match raw.and_then(|value| Self::from_str(value).ok()) {
            Some(TaskStatus::InProgress) => "🔄",
            Some(TaskStatus::Done) => "✅",
            _ => "📋",
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    strum_macros::VariantNames,
    Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn names() -> String {
        Self::VARIANTS.join(", ")
    }

    /// Board glyph for a raw priority string; unknown values render as MEDIUM.
    pub fn glyph_for(raw: Option<&str>) -> &'static str {
        match raw.and_then(|value| Self::from_str(value).ok()) {
            Some(TaskPriority::Low) => "🔵",
            Some(TaskPriority::High) => "🟠",
            Some(TaskPriority::Urgent) => "🔴",
            _ => "🟡",
        }
    }
}
