use rmcp::{
    ErrorData,
    handler::server::{common::FromContextPart, tool::ToolCallContext},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters<P>(pub P);

impl<P: JsonSchema> JsonSchema for Parameters<P> {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        P::schema_name()
    }

    fn json_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        P::json_schema(generator)
    }
}

/// Identifier or integer given either as a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum TextOrNumber {
    Text(String),
    Number(i64),
}

fn hint_for_path(path: &str) -> Option<&'static str> {
    if path.ends_with("workspace_id") {
        return Some("Use the workspace tool's list action to get a valid workspace_id.");
    }
    if path.ends_with("project_id") {
        return Some("Use the project tool's list action (with workspace_id) to get a valid project_id.");
    }
    if path.ends_with("task_id") {
        return Some("Use the task tool's list action (with project_id) to get a valid task_id.");
    }
    if path.ends_with("file_id") {
        return Some("Use the file tool's list action to get a valid file_id.");
    }
    if path.ends_with("attachment_id") {
        return Some("Use the file tool's get_task_attachments action to get a valid attachment_id.");
    }
    if path.ends_with("position") {
        return Some("position must be an integer, e.g. 0.");
    }
    None
}

/// Decodes raw tool arguments, reporting the failing JSON path and a hint.
pub(crate) fn decode_arguments<P>(tool: &str, arguments: Map<String, Value>) -> Result<P, ErrorData>
where
    P: DeserializeOwned,
{
    let value = Value::Object(arguments);
    let parsed: Result<P, serde_path_to_error::Error<serde_json::Error>> =
        serde_path_to_error::deserialize(value);

    parsed.map_err(|err| {
        let path = err.path().to_string();
        let inner = err.into_inner();

        let mut data = Map::new();
        data.insert("tool".to_string(), json!(tool));
        data.insert("code".to_string(), json!("invalid_params"));
        if path != "." {
            data.insert("path".to_string(), json!(path));
        }
        data.insert("error".to_string(), json!(inner.to_string()));
        if let Some(hint) = hint_for_path(&path) {
            data.insert("hint".to_string(), json!(hint));
        }

        ErrorData::invalid_params("Invalid tool parameters", Some(Value::Object(data)))
    })
}

impl<S, P> FromContextPart<ToolCallContext<'_, S>> for Parameters<P>
where
    P: DeserializeOwned,
{
    fn from_context_part(context: &mut ToolCallContext<'_, S>) -> Result<Self, ErrorData> {
        let arguments = context.arguments.take().unwrap_or_default();
        decode_arguments(&context.name, arguments).map(Parameters)
    }
}
