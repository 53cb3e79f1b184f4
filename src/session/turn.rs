//! 单轮调度循环
//!
//! 用户输入 -> 模型调用 -> 若模型请求工具则执行并把结果写回历史，再次调用模型，
//! 直到得到纯文本回复；单轮工具链有显式上限，防止模型反复请求工具造成无限循环。
//! 模型调用失败时按快照回滚本轮全部消息，调用方显示固定致歉语后会话继续。

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::session::{ConversationHistory, Message};
use crate::tools::{tool_call_schema_json, ToolExecutor, ToolRegistry};

/// 模型调用失败时显示的固定致歉语（该轮在历史中不留痕迹）
pub const APOLOGY: &str =
    "Sorry, I could not reach the model just now. Your last message was not recorded; please try again.";

/// 模型返回的 Tool Call（简化 JSON：{"tool": "page_reader", "args": {"command": "..."}}）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

/// 模型单次输出的解析结果
#[derive(Debug, Clone)]
pub enum ModelOutput {
    /// 直接回复用户
    Response(String),
    /// 请求执行工具
    ToolCall(ToolCall),
    /// 看起来是 tool call 但 JSON 无法解析（回传给模型纠正）
    Invalid(String),
}

/// 解析模型输出：```json 围栏或以 { 开头的文本按 tool call 解析，其余视为纯文本回复
pub fn parse_model_output(output: &str) -> ModelOutput {
    let trimmed = output.trim();

    let json_str = if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + 7..];
        rest.find("```")
            .map(|end| rest[..end].trim())
            .unwrap_or_else(|| rest.trim())
    } else if trimmed.starts_with('{') {
        trimmed
    } else {
        return ModelOutput::Response(trimmed.to_string());
    };

    match serde_json::from_str::<ToolCall>(json_str) {
        Ok(tc) if !tc.tool.is_empty() => ModelOutput::ToolCall(tc),
        Ok(_) => ModelOutput::Response(trimmed.to_string()),
        Err(e) => ModelOutput::Invalid(format!("{}: {}", e, json_str)),
    }
}

/// 拼 system prompt：角色设定 + 可用工具及其参数 schema + tool call 协议
pub fn build_system_prompt(registry: &ToolRegistry) -> String {
    let tool_lines: Vec<String> = registry
        .tool_descriptions()
        .into_iter()
        .map(|(name, desc)| format!("- {}: {}", name, desc))
        .collect();
    format!(
        "You are a patient document teacher. The user loads PDF or DOCX documents and you walk \
         them through the content page by page, explaining as you go. Keep answers concise and \
         grounded in the loaded pages.\n\n\
         Available tools:\n{}\n\n\
         To call a tool, reply with ONLY a JSON object matching this schema (no prose around it):\n{}\n\n\
         Tool schemas:\n{}\n\n\
         When no tool is needed, reply with plain text.",
        tool_lines.join("\n"),
        tool_call_schema_json(),
        registry.to_schema_json(),
    )
}

/// 会话：独占对话历史，驱动 读入-求值-回复 循环
pub struct Session {
    llm: Arc<dyn LlmClient>,
    executor: ToolExecutor,
    history: ConversationHistory,
    system_prompt: String,
    max_tool_steps: usize,
}

impl Session {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        executor: ToolExecutor,
        system_prompt: String,
        max_tool_steps: usize,
    ) -> Self {
        Self {
            llm,
            executor,
            history: ConversationHistory::new(),
            system_prompt,
            max_tool_steps,
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn token_usage(&self) -> (u64, u64, u64) {
        self.llm.token_usage()
    }

    /// 处理一轮用户输入，返回最终回复文本。
    /// LlmError 时历史已回滚到本轮开始前的状态；工具错误不中断本轮，作为文本回传模型。
    pub async fn run_turn(&mut self, input: &str) -> Result<String, AgentError> {
        let snapshot = self.history.snapshot();
        self.history.push(Message::user(input));

        let mut steps = 0usize;
        loop {
            let mut messages = Vec::with_capacity(self.history.len() + 1);
            messages.push(Message::system(self.system_prompt.clone()));
            messages.extend_from_slice(self.history.messages());

            let output = match self.llm.complete(&messages).await {
                Ok(o) => o,
                Err(e) => {
                    // 失败的一轮不留痕迹
                    self.history.rollback_to(snapshot);
                    return Err(AgentError::LlmError(e));
                }
            };

            match parse_model_output(&output) {
                ModelOutput::Response(resp) => {
                    self.history.push(Message::assistant(resp.clone()));
                    return Ok(resp);
                }
                ModelOutput::ToolCall(tc) => {
                    if steps >= self.max_tool_steps {
                        let notice = format!(
                            "Reached the tool-call limit ({}) for this turn; stopping here.",
                            self.max_tool_steps
                        );
                        self.history.push(Message::assistant(notice.clone()));
                        return Ok(notice);
                    }
                    steps += 1;
                    self.history.push(Message::assistant(output.clone()));

                    let result_text = match self.executor.execute(&tc.tool, tc.args).await {
                        Ok(result) => format!("Tool result from {}: {}", tc.tool, result),
                        Err(e @ AgentError::UnknownTool(_)) => format!(
                            "{}. Available tools: {}",
                            e,
                            self.executor.tool_names().join(", ")
                        ),
                        Err(e) => format!("Tool {} failed: {}", tc.tool, e),
                    };
                    self.history.push(Message::tool(result_text));
                }
                ModelOutput::Invalid(err) => {
                    if steps >= self.max_tool_steps {
                        let notice = format!(
                            "Reached the tool-call limit ({}) for this turn; stopping here.",
                            self.max_tool_steps
                        );
                        self.history.push(Message::assistant(notice.clone()));
                        return Ok(notice);
                    }
                    steps += 1;
                    self.history.push(Message::assistant(output.clone()));
                    self.history.push(Message::tool(format!(
                        "Could not parse tool call: {}. Reply with plain text or a single \
                         {{\"tool\": ..., \"args\": ...}} JSON object.",
                        err
                    )));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;
    use crate::session::Role;
    use crate::tools::{Tool, ToolRegistry};
    use async_trait::async_trait;

    struct ProbeTool;

    #[async_trait]
    impl Tool for ProbeTool {
        fn name(&self) -> &str {
            "probe"
        }
        fn description(&self) -> &str {
            "returns a fixed probe result"
        }
        async fn execute(&self, _args: serde_json::Value) -> Result<String, String> {
            Ok("probe-result".to_string())
        }
    }

    fn session_with(llm: MockLlmClient, max_steps: usize) -> Session {
        let mut registry = ToolRegistry::new();
        registry.register(ProbeTool);
        let prompt = build_system_prompt(&registry);
        Session::new(
            Arc::new(llm),
            ToolExecutor::new(registry, 5),
            prompt,
            max_steps,
        )
    }

    #[tokio::test]
    async fn plain_response_appends_user_and_assistant() {
        let mut session = session_with(MockLlmClient::with_responses(vec!["Hello!"]), 4);
        let resp = session.run_turn("hi").await.unwrap();
        assert_eq!(resp, "Hello!");
        let msgs = session.history().messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, Role::User);
        assert_eq!(msgs[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn model_failure_rolls_back_exactly() {
        let mut session = session_with(
            MockLlmClient::with_script(vec![
                Ok("First answer".to_string()),
                Err("network down".to_string()),
            ]),
            4,
        );
        session.run_turn("first").await.unwrap();
        let before: Vec<_> = session.history().messages().to_vec();

        let err = session.run_turn("second").await.unwrap_err();
        assert!(matches!(err, AgentError::LlmError(_)));
        assert_eq!(session.history().messages(), before.as_slice());
    }

    #[tokio::test]
    async fn persistent_model_failure_never_pollutes_history() {
        let mut session = session_with(MockLlmClient::failing("gateway unreachable"), 4);
        for _ in 0..3 {
            let err = session.run_turn("anyone there?").await.unwrap_err();
            assert!(matches!(err, AgentError::LlmError(_)));
            assert!(session.history().is_empty());
        }
    }

    #[tokio::test]
    async fn tool_call_is_dispatched_and_result_fed_back() {
        let mut session = session_with(
            MockLlmClient::with_responses(vec![
                r#"{"tool": "probe", "args": {}}"#,
                "Final answer based on probe",
            ]),
            4,
        );
        let resp = session.run_turn("use the probe").await.unwrap();
        assert_eq!(resp, "Final answer based on probe");

        let msgs = session.history().messages();
        assert_eq!(msgs.len(), 4);
        assert_eq!(msgs[2].role, Role::Tool);
        assert!(msgs[2].content.contains("Tool result from probe: probe-result"));
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_to_model() {
        let mut session = session_with(
            MockLlmClient::with_responses(vec![
                r#"{"tool": "ghost", "args": {}}"#,
                "Understood, no such tool",
            ]),
            4,
        );
        let resp = session.run_turn("call a ghost").await.unwrap();
        assert_eq!(resp, "Understood, no such tool");
        let msgs = session.history().messages();
        assert!(msgs[2].content.contains("Unknown tool: ghost"));
        assert!(msgs[2].content.contains("probe"));
    }

    #[tokio::test]
    async fn tool_loop_is_capped() {
        let call = r#"{"tool": "probe", "args": {}}"#;
        let mut session = session_with(
            MockLlmClient::with_responses(vec![call, call, call, call]),
            2,
        );
        let resp = session.run_turn("loop forever").await.unwrap();
        assert!(resp.contains("tool-call limit (2)"));
    }

    #[tokio::test]
    async fn invalid_tool_json_is_sent_back_for_correction() {
        let mut session = session_with(
            MockLlmClient::with_responses(vec![
                r#"{"tool": "probe", "args": }"#,
                "Recovered",
            ]),
            4,
        );
        let resp = session.run_turn("go").await.unwrap();
        assert_eq!(resp, "Recovered");
        let msgs = session.history().messages();
        assert!(msgs[2].content.contains("Could not parse tool call"));
    }

    #[test]
    fn parse_treats_prose_as_response() {
        match parse_model_output("Just a plain answer with {braces} inside. Kind of.") {
            ModelOutput::Response(_) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn parse_extracts_fenced_json() {
        let out = "Let me check.\n```json\n{\"tool\": \"probe\", \"args\": {}}\n```";
        match parse_model_output(out) {
            ModelOutput::ToolCall(tc) => assert_eq!(tc.tool, "probe"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn parse_empty_tool_name_is_response() {
        match parse_model_output(r#"{"tool": "", "args": {}}"#) {
            ModelOutput::Response(_) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }
}
