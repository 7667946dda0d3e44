use async_trait::async_trait;
use models::{Attachment, StoredFile};
use serde_json::json;
use strum::VariantNames as _;
use strum_macros::{Display, EnumString, VariantNames};

use crate::{
    api::{ApiClient, segment},
    args::ToolArgs,
    error::ToolError,
    tool::{Tool, ToolOutcome},
    transport::HttpMethod,
};

const RESOURCE: &str = "file";

pub const UPLOAD_UNSUPPORTED: &str = "File upload functionality requires multipart form data \
    handling which is not implemented in this simplified version. Please use the web interface \
    for file uploads.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, VariantNames)]
#[strum(serialize_all = "snake_case")]
pub enum FileAction {
    List,
    Upload,
    AttachToTask,
    AddUrlToTask,
    RemoveTaskAttachment,
    GetTaskAttachments,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileCommand {
    List,
    Upload,
    AttachToTask {
        task_id: String,
        file_id: String,
    },
    AddUrlToTask {
        task_id: String,
        url: String,
        name: String,
    },
    RemoveTaskAttachment {
        task_id: String,
        attachment_id: String,
    },
    GetTaskAttachments {
        task_id: String,
    },
}

impl FileCommand {
    pub fn parse(args: &ToolArgs) -> Result<Self, ToolError> {
        let command = match args.action::<FileAction>()? {
            FileAction::List => Self::List,
            FileAction::Upload => Self::Upload,
            FileAction::AttachToTask => {
                let (task_id, file_id) = args.required_pair("task_id", "file_id", None)?;
                Self::AttachToTask { task_id, file_id }
            }
            FileAction::AddUrlToTask => {
                let (task_id, url) = args.required_pair("task_id", "url", None)?;
                let name = args.text("name").unwrap_or_else(|| url.clone());
                Self::AddUrlToTask { task_id, url, name }
            }
            FileAction::RemoveTaskAttachment => {
                let (task_id, attachment_id) =
                    args.required_pair("task_id", "attachment_id", None)?;
                Self::RemoveTaskAttachment {
                    task_id,
                    attachment_id,
                }
            }
            FileAction::GetTaskAttachments => Self::GetTaskAttachments {
                task_id: args.required("task_id")?,
            },
        };
        Ok(command)
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Self::List => "listing files",
            Self::Upload => "uploading file",
            Self::AttachToTask { .. } => "attaching file to task",
            Self::AddUrlToTask { .. } => "adding URL to task",
            Self::RemoveTaskAttachment { .. } => "removing attachment",
            Self::GetTaskAttachments { .. } => "getting task attachments",
        }
    }
}

/// The file library and task attachments.
#[derive(Debug, Clone)]
pub struct FileClient {
    api: ApiClient,
}

impl FileClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn run(&self, base_url: &str, command: FileCommand) -> Result<String, ToolError> {
        let operation = command.operation();
        match command {
            FileCommand::List => {
                let request = ApiClient::request(base_url, HttpMethod::Get, "/files/list");
                let files: Option<Vec<StoredFile>> =
                    self.api.call_json(RESOURCE, operation, request).await?;
                Ok(render_files(&files.unwrap_or_default()))
            }
            // Multipart is out of reach for the JSON transport.
            FileCommand::Upload => Err(ToolError::Unsupported(UPLOAD_UNSUPPORTED)),
            FileCommand::AttachToTask { task_id, file_id } => {
                let path = format!("/tasks/{}/attachments/file", segment(&task_id));
                let request = ApiClient::request(base_url, HttpMethod::Post, &path)
                    .json(json!({ "fileId": file_id }));
                self.api.call(operation, request).await?;
                Ok(format!("Successfully attached file to task {}", task_id))
            }
            FileCommand::AddUrlToTask { task_id, url, name } => {
                let path = format!("/tasks/{}/attachments/url", segment(&task_id));
                let request = ApiClient::request(base_url, HttpMethod::Post, &path)
                    .json(json!({ "url": url, "name": name }));
                self.api.call(operation, request).await?;
                Ok(format!("Successfully added URL '{}' to task {}", name, task_id))
            }
            FileCommand::RemoveTaskAttachment {
                task_id,
                attachment_id,
            } => {
                let path = format!(
                    "/tasks/{}/attachments/{}",
                    segment(&task_id),
                    segment(&attachment_id)
                );
                let request = ApiClient::request(base_url, HttpMethod::Delete, &path);
                self.api.call(operation, request).await?;
                Ok(format!("Successfully removed attachment from task {}", task_id))
            }
            FileCommand::GetTaskAttachments { task_id } => {
                let path = format!("/tasks/{}/attachments", segment(&task_id));
                let request = ApiClient::request(base_url, HttpMethod::Get, &path);
                let attachments: Option<Vec<Attachment>> =
                    self.api.call_json(RESOURCE, operation, request).await?;
                Ok(render_attachments(&attachments.unwrap_or_default()))
            }
        }
    }
}

fn render_files(files: &[StoredFile]) -> String {
    if files.is_empty() {
        return "No files found".to_string();
    }
    let lines: Vec<String> = files
        .iter()
        .map(|file| {
            format!(
                "- {} (ID: {}) - Type: {}{}",
                file.name,
                file.id,
                file.mime_type.as_deref().unwrap_or("unknown"),
                file.size_suffix()
            )
        })
        .collect();
    format!("Found {} file(s):\n{}", files.len(), lines.join("\n"))
}

fn render_attachments(attachments: &[Attachment]) -> String {
    if attachments.is_empty() {
        return "No attachments found for this task".to_string();
    }
    let lines: Vec<String> = attachments
        .iter()
        .map(|attachment| {
            if attachment.is_url() {
                format!(
                    "- 🔗 {} (ID: {}) - URL: {}",
                    attachment.name,
                    attachment.id,
                    attachment.url.as_deref().unwrap_or("N/A")
                )
            } else {
                format!(
                    "- 📁 {} (ID: {}) - Type: {}{}",
                    attachment.name,
                    attachment.id,
                    attachment.mime_type.as_deref().unwrap_or("unknown"),
                    attachment.size_suffix()
                )
            }
        })
        .collect();
    format!(
        "Task attachments ({}):\n{}",
        attachments.len(),
        lines.join("\n")
    )
}

#[async_trait]
impl Tool for FileClient {
    fn name(&self) -> &'static str {
        "file"
    }

    fn description(&self) -> &'static str {
        "Manage files and task attachments: list, upload, attach_to_task, \
        add_url_to_task, remove_task_attachment, get_task_attachments."
    }

    fn actions(&self) -> &'static [&'static str] {
        FileAction::VARIANTS
    }

    async fn execute(&self, args: &ToolArgs) -> ToolOutcome {
        let result = match FileCommand::parse(args) {
            Ok(command) => self.run(&self.api.base_url(args), command).await,
            Err(err) => Err(err),
        };
        result.into()
    }
}
