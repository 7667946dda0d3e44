use async_trait::async_trait;
use models::{Project, project::DEFAULT_PROJECT_ICON};
use serde_json::{Map, Value, json};
use strum::VariantNames as _;
use strum_macros::{Display, EnumString, VariantNames};

use crate::{
    api::{ApiClient, segment, with_query},
    args::ToolArgs,
    error::ToolError,
    tool::{Tool, ToolOutcome},
    transport::HttpMethod,
};

const RESOURCE: &str = "project";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, VariantNames)]
#[strum(serialize_all = "snake_case")]
pub enum ProjectAction {
    Create,
    List,
    Get,
    Update,
    Delete,
}

/// Fields a project update may carry besides the mandatory `workspaceId`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub slug: Option<String>,
}

impl ProjectChanges {
    fn from_args(args: &ToolArgs) -> Self {
        Self {
            name: args.text("name"),
            description: args.present_text("description"),
            icon: args.text("icon"),
            slug: args.text("slug"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.icon.is_none() && self.slug.is_none()
    }

    fn into_body(self, workspace_id: String) -> Value {
        let mut body = Map::new();
        body.insert("workspaceId".to_string(), Value::String(workspace_id));
        let fields = [
            ("name", self.name),
            ("description", self.description),
            ("icon", self.icon),
            ("slug", self.slug),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                body.insert(key.to_string(), Value::String(value));
            }
        }
        Value::Object(body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectCommand {
    Create {
        name: String,
        workspace_id: String,
        description: String,
        icon: String,
        slug: String,
    },
    List {
        workspace_id: String,
    },
    Get {
        project_id: String,
        workspace_id: String,
    },
    Update {
        project_id: String,
        workspace_id: String,
        changes: ProjectChanges,
    },
    Delete {
        project_id: String,
    },
}

impl ProjectCommand {
    pub fn parse(args: &ToolArgs) -> Result<Self, ToolError> {
        let command = match args.action::<ProjectAction>()? {
            ProjectAction::Create => {
                let (name, workspace_id) =
                    args.required_pair("name", "workspace_id", Some("creating a project"))?;
                let slug = args
                    .text("slug")
                    .unwrap_or_else(|| Project::slug_from_name(&name));
                Self::Create {
                    description: args.present_text("description").unwrap_or_default(),
                    icon: args
                        .text("icon")
                        .unwrap_or_else(|| DEFAULT_PROJECT_ICON.to_string()),
                    slug,
                    name,
                    workspace_id,
                }
            }
            ProjectAction::List => Self::List {
                workspace_id: args.required("workspace_id")?,
            },
            ProjectAction::Get => {
                let (project_id, workspace_id) =
                    args.required_pair("project_id", "workspace_id", None)?;
                Self::Get {
                    project_id,
                    workspace_id,
                }
            }
            ProjectAction::Update => {
                let (project_id, workspace_id) =
                    args.required_pair("project_id", "workspace_id", None)?;
                let changes = ProjectChanges::from_args(args);
                if changes.is_empty() {
                    return Err(ToolError::Validation(
                        "At least one of 'name', 'description', 'icon', or 'slug' must be provided"
                            .to_string(),
                    ));
                }
                Self::Update {
                    project_id,
                    workspace_id,
                    changes,
                }
            }
            ProjectAction::Delete => Self::Delete {
                project_id: args.required("project_id")?,
            },
        };
        Ok(command)
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Self::Create { .. } => "creating project",
            Self::List { .. } => "listing projects",
            Self::Get { .. } => "getting project",
            Self::Update { .. } => "updating project",
            Self::Delete { .. } => "deleting project",
        }
    }
}

/// Projects inside one workspace.
#[derive(Debug, Clone)]
pub struct ProjectClient {
    api: ApiClient,
}

impl ProjectClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn run(&self, base_url: &str, command: ProjectCommand) -> Result<String, ToolError> {
        let operation = command.operation();
        match command {
            ProjectCommand::Create {
                name,
                workspace_id,
                description,
                icon,
                slug,
            } => {
                let request = ApiClient::request(base_url, HttpMethod::Post, "/project/create")
                    .json(json!({
                        "name": name,
                        "description": description,
                        "workspaceId": workspace_id,
                        "icon": icon,
                        "slug": slug,
                    }));
                let project: Project = self.api.call_json(RESOURCE, operation, request).await?;
                Ok(format!(
                    "Successfully created project '{}' (ID: {}) in workspace {}",
                    project.name, project.id, workspace_id
                ))
            }
            ProjectCommand::List { workspace_id } => {
                let path = format!("/project/list/{}", segment(&workspace_id));
                let request = ApiClient::request(base_url, HttpMethod::Get, &path);
                let projects: Option<Vec<Project>> =
                    self.api.call_json(RESOURCE, operation, request).await?;
                Ok(render_projects(&projects.unwrap_or_default()))
            }
            ProjectCommand::Get {
                project_id,
                workspace_id,
            } => {
                let path = with_query(
                    &format!("/project/{}", segment(&project_id)),
                    "workspaceId",
                    &workspace_id,
                );
                let request = ApiClient::request(base_url, HttpMethod::Get, &path);
                let project: Project = self.api.call_json(RESOURCE, operation, request).await?;
                Ok(render_project(&project, &workspace_id))
            }
            ProjectCommand::Update {
                project_id,
                workspace_id,
                changes,
            } => {
                let path = format!("/project/{}", segment(&project_id));
                let request = ApiClient::request(base_url, HttpMethod::Put, &path)
                    .json(changes.into_body(workspace_id));
                let updated = self.api.call_value(RESOURCE, operation, request).await?;
                let name = updated
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or(&project_id);
                Ok(format!("Successfully updated project '{}' (ID: {})", name, project_id))
            }
            ProjectCommand::Delete { project_id } => {
                let path = format!("/project/{}", segment(&project_id));
                let request = ApiClient::request(base_url, HttpMethod::Delete, &path);
                self.api.call(operation, request).await?;
                Ok(format!("Successfully deleted project (ID: {})", project_id))
            }
        }
    }
}

fn render_projects(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects found in this workspace".to_string();
    }
    let lines: Vec<String> = projects
        .iter()
        .map(|project| {
            format!(
                "- {} {} (ID: {}) - {}",
                project.icon_or_default(),
                project.name,
                project.id,
                project.description.as_deref().unwrap_or("No description")
            )
        })
        .collect();
    format!(
        "Found {} project(s) in workspace:\n{}",
        projects.len(),
        lines.join("\n")
    )
}

fn render_project(project: &Project, requested_workspace: &str) -> String {
    let workspace_id = project
        .workspace_id
        .as_ref()
        .map(|id| id.as_str())
        .unwrap_or(requested_workspace);
    format!(
        "Project Details:\nName: {}\nID: {}\nIcon: {}\nDescription: {}\nWorkspace ID: {}\nSlug: {}\nCreated: {}",
        project.name,
        project.id,
        project.icon_or_default(),
        project.description.as_deref().unwrap_or("None"),
        workspace_id,
        project.slug.as_deref().unwrap_or("N/A"),
        project.created_at.as_deref().unwrap_or("Unknown"),
    )
}

#[async_trait]
impl Tool for ProjectClient {
    fn name(&self) -> &'static str {
        "project"
    }

    fn description(&self) -> &'static str {
        "Manage projects inside a workspace: create, list, get, update, delete."
    }

    fn actions(&self) -> &'static [&'static str] {
        ProjectAction::VARIANTS
    }

    async fn execute(&self, args: &ToolArgs) -> ToolOutcome {
        let result = match ProjectCommand::parse(args) {
            Ok(command) => self.run(&self.api.base_url(args), command).await,
            Err(err) => Err(err),
        };
        result.into()
    }
}
