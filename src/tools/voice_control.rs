//! voice_control 工具
//!
//! 与 CLI 字面命令共用 VoiceCommand；目录外音色的拒绝以文本回传给模型。

use async_trait::async_trait;
use serde_json::Value;

use crate::session::SharedState;
use crate::tools::Tool;
use crate::voice::VoiceCommand;

pub struct VoiceControlTool {
    state: SharedState,
}

impl VoiceControlTool {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Tool for VoiceControlTool {
    fn name(&self) -> &str {
        "voice_control"
    }

    fn description(&self) -> &str {
        "Control spoken output. Args: {\"command\": \"<cmd>\"} where <cmd> is one of \
         list_voices, set_voice:<name>, enable_voice, disable_voice, voice_status"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "enum": [
                        "list_voices",
                        "set_voice:<name>",
                        "enable_voice",
                        "disable_voice",
                        "voice_status"
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
        let command = VoiceCommand::parse(command)?;

        let mut state = self.state.lock().expect("session state lock");
        state.voice.apply(command).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentFormat, DocumentParser, LoadError};
    use crate::session::SessionState;
    use std::path::Path;
    use std::sync::Arc;

    struct NoopParser;

    impl DocumentParser for NoopParser {
        fn parse(
            &self,
            _path: &Path,
            _format: DocumentFormat,
        ) -> Result<Vec<String>, LoadError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn set_voice_scenario() {
        let state = SessionState::shared(Arc::new(NoopParser));
        let tool = VoiceControlTool::new(state.clone());

        let reply = tool
            .execute(serde_json::json!({ "command": "set_voice:Matthew" }))
            .await
            .unwrap();
        assert_eq!(reply, "Voice set to Matthew");

        let err = tool
            .execute(serde_json::json!({ "command": "set_voice:Zeus" }))
            .await
            .unwrap_err();
        assert!(err.contains("Zeus"));

        let listing = tool
            .execute(serde_json::json!({ "command": "list_voices" }))
            .await
            .unwrap();
        assert!(listing.contains("Matthew (male) [selected]"));
    }
}
