pub mod hello;
pub mod launch;

use std::path::PathBuf;

use rmcp::model::{CallToolResult, Content, Tool};
use serde_json::{json, Map, Value};

use crate::config::Platform;

/// Tools answered in-process, never forwarded upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTool {
    Hello,
    Open,
}

impl LocalTool {
    pub const ALL: [LocalTool; 2] = [LocalTool::Hello, LocalTool::Open];

    pub fn name(self) -> &'static str {
        match self {
            LocalTool::Hello => "helloWayStation",
            LocalTool::Open => "openWayStation",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn descriptor(self) -> Tool {
        let description = match self {
            LocalTool::Hello => "Introduces WayStation and explains how to connect your apps",
            LocalTool::Open => "Opens the WayStation desktop app so you can connect and manage integrations",
        };
        Tool::new(self.name(), description, empty_schema())
    }
}

pub fn descriptors() -> Vec<Tool> {
    LocalTool::ALL.into_iter().map(LocalTool::descriptor).collect()
}

fn empty_schema() -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), json!({}));
    schema
}

pub fn result_text(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

pub fn error_text(text: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(text.into())])
}

/// Everything the local tools need from the host.
#[derive(Debug, Clone)]
pub struct LocalTools {
    pub config_dir: PathBuf,
    pub platform: Platform,
}

impl LocalTools {
    pub fn new(config_dir: PathBuf, platform: Platform) -> Self {
        Self { config_dir, platform }
    }

    pub async fn call(&self, tool: LocalTool) -> CallToolResult {
        match tool {
            LocalTool::Hello => hello::hello(),
            LocalTool::Open => launch::open_way_station(&self.config_dir, &self.platform).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_names_only() {
        assert_eq!(LocalTool::from_name("helloWayStation"), Some(LocalTool::Hello));
        assert_eq!(LocalTool::from_name("openWayStation"), Some(LocalTool::Open));
        assert_eq!(LocalTool::from_name("hellowaystation"), None);
        assert_eq!(LocalTool::from_name("notion_search"), None);
    }

    #[test]
    fn descriptors_are_ordered_with_empty_schema() {
        let tools = descriptors();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert_eq!(names, ["helloWayStation", "openWayStation"]);

        let v = serde_json::to_value(&tools[0]).unwrap();
        assert_eq!(v["inputSchema"], json!({ "type": "object", "properties": {} }));
    }
}
