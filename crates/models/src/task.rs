use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::ResourceId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub project_id: Option<ResourceId>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub assignee_name: Option<String>,
    #[serde(default)]
    /// Kept as the raw number; boards reorder with fractional positions.
    pub position: Option<serde_json::Number>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Task {
    /// Display name, then email, then "Unassigned". Blank values are skipped.
    pub fn assignee(&self) -> &str {
        [self.assignee_name.as_deref(), self.user_email.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
            .unwrap_or("Unassigned")
    }
}

/// Kanban-shaped listing: tasks grouped by column plus side buckets.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBoard {
    pub columns: Vec<TaskColumn>,
    #[serde(default)]
    pub archived_tasks: Option<Vec<Task>>,
    #[serde(default)]
    pub planned_tasks: Option<Vec<Task>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskColumn {
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
}

impl TaskBoard {
    /// Column tasks in column order, then archived, then planned.
    pub fn into_tasks(self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .columns
            .into_iter()
            .flat_map(|column| column.tasks.unwrap_or_default())
            .collect();
        tasks.extend(self.archived_tasks.unwrap_or_default());
        tasks.extend(self.planned_tasks.unwrap_or_default());
        tasks
    }
}

/// Flattens a task-list response into one ordered sequence.
///
/// Accepts a bare array of tasks or a board object carrying `columns`. Any
/// other shape is treated as an empty listing.
pub fn flatten_task_listing(body: Value) -> Result<Vec<Task>, serde_json::Error> {
    let is_board = body
        .as_object()
        .is_some_and(|map| map.contains_key("columns"));

    if body.is_array() {
        serde_json::from_value(body)
    } else if is_board {
        serde_json::from_value::<TaskBoard>(body).map(TaskBoard::into_tasks)
    } else {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.title.as_str()).collect()
    }

    fn task(id: u32, title: &str) -> Value {
        json!({ "id": id, "title": title })
    }

    #[test]
    fn board_listing_keeps_column_then_bucket_order() {
        let body = json!({
            "columns": [
                { "tasks": [task(1, "A"), task(2, "B")] },
                { "tasks": [task(3, "C")] }
            ],
            "archivedTasks": [task(4, "D")],
            "plannedTasks": []
        });
        let tasks = flatten_task_listing(body).unwrap();
        assert_eq!(titles(&tasks), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn bare_list_is_taken_as_is() {
        let tasks = flatten_task_listing(json!([task(1, "A"), task(2, "B")])).unwrap();
        assert_eq!(titles(&tasks), vec!["A", "B"]);
    }

    #[test]
    fn null_buckets_and_columns_without_tasks_are_empty() {
        let body = json!({
            "columns": [{ "name": "Backlog" }, { "tasks": null }],
            "archivedTasks": null
        });
        assert!(flatten_task_listing(body).unwrap().is_empty());
    }

    #[test]
    fn unrecognized_shapes_list_nothing() {
        assert!(flatten_task_listing(json!({ "tasks": [task(1, "A")] })).unwrap().is_empty());
        assert!(flatten_task_listing(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn malformed_task_is_an_error() {
        assert!(flatten_task_listing(json!([{ "id": 1 }])).is_err());
    }

    #[test]
    fn assignee_prefers_name_then_email() {
        let mut task: Task = serde_json::from_value(task(1, "A")).unwrap();
        assert_eq!(task.assignee(), "Unassigned");
        task.user_email = Some(String::new());
        assert_eq!(task.assignee(), "Unassigned");
        task.user_email = Some("dev@example.com".to_string());
        assert_eq!(task.assignee(), "dev@example.com");
        task.assignee_name = Some("Dev".to_string());
        assert_eq!(task.assignee(), "Dev");
    }
}
