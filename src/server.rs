use std::sync::Arc;

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    Error as McpError, RoleServer, ServerHandler,
};

use crate::auth::CredentialResolver;
use crate::bridge::{relay_result, Bridge};
use crate::tools::{self, error_text, LocalTool, LocalTools};

const MISSING_KEY: &str = "WAY_KEY not set";

#[derive(Clone)]
pub struct WayStationMcp {
    pub bridge: Arc<Bridge>,
    pub resolver: Arc<CredentialResolver>,
    pub local: Arc<LocalTools>,
}

impl WayStationMcp {
    /// Remote catalog first, then the local tools.
    pub async fn catalog(&self) -> Result<ListToolsResult, McpError> {
        // Refresh for its side effect; listing itself is unauthenticated
        let _ = self.resolver.resolve();

        let mut tools = self.bridge.list_tools().await.map_err(|e| {
            tracing::error!(error = %e, "Listing upstream tools failed");
            McpError::internal_error(e.to_string(), None)
        })?;
        tools.extend(tools::descriptors());

        Ok(ListToolsResult { next_cursor: None, tools })
    }

    pub async fn dispatch(&self, request: CallToolRequestParam) -> CallToolResult {
        if let Some(tool) = LocalTool::from_name(&request.name) {
            return self.local.call(tool).await;
        }

        let Some(token) = self.resolver.resolve() else {
            tracing::warn!(tool = %request.name, "No API key available, not forwarding");
            return error_text(MISSING_KEY);
        };

        tracing::debug!(tool = %request.name, "Forwarding tool call");
        let outcome = self.bridge.call_tool(&token, &request).await.and_then(relay_result);
        outcome.unwrap_or_else(|e| {
            tracing::warn!(tool = %request.name, error = %e, "Tool call failed");
            error_text(e.to_string())
        })
    }
}

impl ServerHandler for WayStationMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "waystation".into(),
                version: env!("CARGO_PKG_VERSION").into(),
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        self.catalog().await
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(request).await)
    }
}
