use reqwest::{header, Client};
use rmcp::model::{CallToolRequestParam, CallToolResult, Content, Tool};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::sanitize::strip_control_chars;

#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    #[error("WayStation API not reachable: {0}")]
    ConnectionFailed(#[from] reqwest::Error),
    #[error("WayStation API returned {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },
    #[error("Invalid JSON from WayStation API: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct ToolCatalog {
    tools: Vec<Value>,
}

/// HTTP client for the remote tool service.
#[derive(Clone)]
pub struct Bridge {
    client: Client,
    base_url: String,
}

impl Bridge {
    pub fn new(base_url: String) -> Self {
        Self { client: Client::new(), base_url }
    }

    pub async fn list_tools(&self) -> Result<Vec<Tool>, BridgeError> {
        let url = format!("{}/tools/list", self.base_url);
        let resp = self.client
            .get(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let catalog: ToolCatalog = read_json(resp).await?;
        catalog.tools.into_iter().map(to_tool).collect()
    }

    /// Forwards a tool call with the raw token in `Authorization` and returns the upstream JSON as-is.
    pub async fn call_tool(&self, token: &str, request: &CallToolRequestParam) -> Result<Value, BridgeError> {
        let url = format!("{}/tools/call", self.base_url);
        let body = json!({ "method": "tools/call", "params": request });
        let resp = self.client
            .post(&url)
            .header(header::AUTHORIZATION, token)
            .json(&body)
            .send()
            .await?;

        // The API answers failures with a regular tool result, whatever the status
        let status = resp.status();
        let text = resp.text().await?;
        match serde_json::from_str::<Value>(&strip_control_chars(&text)) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(BridgeError::Status { status, body: text }),
            Err(e) => Err(e.into()),
        }
    }
}

// Remote descriptors are opaque; only the fields the protocol type requires are filled in
fn to_tool(mut descriptor: Value) -> Result<Tool, BridgeError> {
    if let Some(fields) = descriptor.as_object_mut() {
        if fields.get("description").map_or(true, Value::is_null) {
            fields.insert("description".into(), json!(""));
        }
        if fields.get("inputSchema").map_or(true, Value::is_null) {
            fields.insert("inputSchema".into(), json!({ "type": "object" }));
        }
    }
    Ok(serde_json::from_value(descriptor)?)
}

async fn read_json<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, BridgeError> {
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        return Err(BridgeError::Status { status, body: text });
    }
    Ok(serde_json::from_str(&strip_control_chars(&text))?)
}

/// Maps an upstream tool result onto the protocol result. The error flag is
/// read from `isError`, or from the legacy `error` boolean the API also emits.
pub fn relay_result(value: Value) -> Result<CallToolResult, BridgeError> {
    let is_error = value
        .get("isError")
        .or_else(|| value.get("error"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let items: Vec<Value> = match value.get("content") {
        Some(content) => serde_json::from_value(content.clone())?,
        None => Vec::new(),
    };
    // Content kinds the protocol types do not know are passed on as their raw JSON text
    let content = items
        .into_iter()
        .map(|item| serde_json::from_value(item.clone()).unwrap_or_else(|_| Content::text(item.to_string())))
        .collect();

    Ok(if is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    })
}
