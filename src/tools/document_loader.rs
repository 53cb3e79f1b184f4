//! document_loader 工具
//!
//! 把用户给的文件路径交给 DocumentStore.load；成功返回加载摘要，
//! 失败（坏路径 / 不支持格式 / 解析错误）以文本回传给模型，旧文档不受影响。

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::session::SharedState;
use crate::tools::Tool;

pub struct DocumentLoaderTool {
    state: SharedState,
}

impl DocumentLoaderTool {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Tool for DocumentLoaderTool {
    fn name(&self) -> &str {
        "document_loader"
    }

    fn description(&self) -> &str {
        "Load a .pdf or .docx document from a file path so it can be read page by page. \
         Replaces any previously loaded document. Args: {\"path\": \"/path/to/file.pdf\"}"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": { "type": "string", "description": "Path to a .pdf or .docx file" }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String, String> {
        let path = args
            .get("path")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| "Missing 'path' argument".to_string())?;

        let mut state = self.state.lock().expect("session state lock");
        let summary = state
            .document
            .load(Path::new(path))
            .map_err(|e| e.to_string())?;
        Ok(format!("{}. The reader is at page 1.", summary))
    }
}
