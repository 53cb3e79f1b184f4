//! page_reader 工具
//!
//! 命令字符串在边界处解析为 PageCommand，内部调度是穷尽匹配；
//! 越界导航的拒绝与未加载文档的固定提示都以文本回传。

use async_trait::async_trait;
use serde_json::Value;

use crate::document::PageCommand;
use crate::session::SharedState;
use crate::tools::Tool;

pub struct PageReaderTool {
    state: SharedState,
}

impl PageReaderTool {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Tool for PageReaderTool {
    fn name(&self) -> &str {
        "page_reader"
    }

    fn description(&self) -> &str {
        "Navigate and read the loaded document. Args: {\"command\": \"<cmd>\"} where <cmd> is one of \
         read_current_page, next_page, previous_page, go_to_page:<n>, document_summary, page_count"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "enum": [
                        "read_current_page",
                        "next_page",
                        "previous_page",
                        "go_to_page:<n>",
                        "document_summary",
                        "page_count"
                    ]
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String, String> {
        let command = args
            .get("command")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "Missing 'command' argument".to_string())?;
        let command = PageCommand::parse(command)?;

        let mut state = self.state.lock().expect("session state lock");
        state.document.apply(command).map_err(|e| e.to_string())
    }
}
