use rmcp::model::CallToolResult;

use super::result_text;

const WELCOME: &str = "\
Welcome to WayStation!

WayStation connects your assistant to the productivity tools you already use:
Notion, Slack, Monday, Asana, Google Drive, Office 365 and more.

To get started:
  1. Call the openWayStation tool to open the WayStation app.
  2. Connect the apps you want to use.
  3. Ask your assistant to work with them. New tools show up automatically.

Learn more at https://waystation.ai";

pub fn hello() -> CallToolResult {
    result_text(WELCOME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_welcome_text() {
        let v = serde_json::to_value(hello()).unwrap();
        assert_eq!(v["isError"], false);
        assert_eq!(v["content"][0]["type"], "text");
        assert!(v["content"][0]["text"].as_str().unwrap().starts_with("Welcome to WayStation!"));
    }
}
