//! 会话集成测试：真实工具 + 脚本化 LLM，覆盖 加载 -> 翻页 -> 回答 全链路

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use lector::document::{DocumentFormat, DocumentParser, LoadError};
use lector::llm::MockLlmClient;
use lector::session::{build_system_prompt, Role, Session, SessionState, SharedState};
use lector::tools::{
    DocumentLoaderTool, PageReaderTool, ToolExecutor, ToolRegistry, VoiceControlTool,
};

struct SlidesParser;

impl DocumentParser for SlidesParser {
    fn parse(&self, _path: &Path, _format: DocumentFormat) -> Result<Vec<String>, LoadError> {
        Ok(vec![
            "intro slide".to_string(),
            "method slide".to_string(),
            "summary slide".to_string(),
        ])
    }
}

fn build_session(state: SharedState, llm: MockLlmClient) -> Session {
    let mut registry = ToolRegistry::new();
    registry.register(DocumentLoaderTool::new(state.clone()));
    registry.register(PageReaderTool::new(state.clone()));
    registry.register(VoiceControlTool::new(state));
    let prompt = build_system_prompt(&registry);
    Session::new(Arc::new(llm), ToolExecutor::new(registry, 5), prompt, 8)
}

#[tokio::test]
async fn load_read_and_answer_in_one_turn() {
    let state = SessionState::shared(Arc::new(SlidesParser));

    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(b"%PDF-stub").unwrap();
    let path = file.path().display().to_string();

    let load_call = format!(
        r#"{{"tool": "document_loader", "args": {{"path": "{}"}}}}"#,
        path
    );
    let llm = MockLlmClient::with_responses(vec![
        load_call.as_str(),
        r#"{"tool": "page_reader", "args": {"command": "read_current_page"}}"#,
        "The document opens with an intro slide.",
    ]);
    let mut session = build_session(state.clone(), llm);

    let resp = session.run_turn("teach me slides.pdf").await.unwrap();
    assert_eq!(resp, "The document opens with an intro slide.");

    // 工具结果按序进入历史：user, tool call, result, tool call, result, final
    let msgs = session.history().messages();
    assert_eq!(msgs.len(), 6);
    assert!(msgs[2].content.contains("3 pages"));
    assert!(msgs[4].content.contains("Page 1/3"));
    assert!(msgs[4].content.contains("intro slide"));
    assert_eq!(msgs[5].role, Role::Assistant);

    // 文档已就位，游标在第 0 页
    let guard = state.lock().unwrap();
    assert_eq!(guard.document.cursor(), 0);
    assert_eq!(guard.document.current_document().unwrap().page_count(), 3);
}

#[tokio::test]
async fn voice_selection_via_tool_updates_session_state() {
    let state = SessionState::shared(Arc::new(SlidesParser));
    let llm = MockLlmClient::with_responses(vec![
        r#"{"tool": "voice_control", "args": {"command": "set_voice:Matthew"}}"#,
        "Done, I'll use Matthew from now on.",
    ]);
    let mut session = build_session(state.clone(), llm);

    session.run_turn("switch to a male voice").await.unwrap();
    assert_eq!(state.lock().unwrap().voice.selected(), "Matthew");
}

#[tokio::test]
async fn failed_model_call_leaves_no_trace_across_turns() {
    let state = SessionState::shared(Arc::new(SlidesParser));
    let llm = MockLlmClient::with_script(vec![
        Ok("Welcome!".to_string()),
        Err("auth expired".to_string()),
        Ok("Back online.".to_string()),
    ]);
    let mut session = build_session(state, llm);

    session.run_turn("hello").await.unwrap();
    let before: Vec<_> = session.history().messages().to_vec();

    assert!(session.run_turn("doomed").await.is_err());
    assert_eq!(session.history().messages(), before.as_slice());

    // 会话在失败后继续可用
    let resp = session.run_turn("are you there?").await.unwrap();
    assert_eq!(resp, "Back online.");
    assert_eq!(session.history().len(), 4);
}
