//! Lector - 语音文档教师 CLI
//!
//! 入口：初始化日志、加载配置并校验凭证（缺必需 API Key 即退出）、
//! 组装会话状态 / 工具 / LLM / 语音组件，进入交互循环。

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lector::config::{load_config, Credentials};
use lector::document::FileParser;
use lector::llm::create_llm_from_config;
use lector::repl::run_repl;
use lector::session::{build_system_prompt, Session, SessionState};
use lector::speech::{player, HttpSynthesizer, SpeechOutput, SpeechSynthesizer};
use lector::tools::{
    DocumentLoaderTool, PageReaderTool, ToolExecutor, ToolRegistry, VoiceControlTool,
    WebSearchTool,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日志：默认 info，可通过 RUST_LOG 覆盖
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with(fmt::layer())
        .init();

    let cfg = load_config().context("Failed to load config")?;
    // 唯一的致命错误：必需凭证缺失
    let creds = Credentials::from_env(&cfg.llm.provider).context("Startup credential check")?;

    let state = SessionState::shared(Arc::new(FileParser));

    let mut registry = ToolRegistry::new();
    registry.register(DocumentLoaderTool::new(state.clone()));
    registry.register(PageReaderTool::new(state.clone()));
    registry.register(VoiceControlTool::new(state.clone()));
    registry.register(WebSearchTool::new(
        &creds.search_api_key,
        cfg.search.timeout_secs,
        cfg.search.max_results,
        cfg.search.max_result_chars,
    ));
    let system_prompt = build_system_prompt(&registry);
    let executor = ToolExecutor::new(registry, cfg.tools.tool_timeout_secs);

    let llm = create_llm_from_config(&cfg, &creds);
    let mut session = Session::new(llm, executor, system_prompt, cfg.session.max_tool_steps);

    let synthesizer: Option<Arc<dyn SpeechSynthesizer>> =
        creds.speech_api_key.as_deref().map(|key| {
            Arc::new(HttpSynthesizer::new(
                key,
                creds.speech_base_url.as_deref(),
                &cfg.speech.model,
                cfg.speech.timeout_secs,
            )) as Arc<dyn SpeechSynthesizer>
        });
    let speech = SpeechOutput::new(
        synthesizer,
        cfg.speech.audio_dir.clone(),
        cfg.speech.max_chunk_chars,
        cfg.speech
            .player
            .clone()
            .unwrap_or_else(|| player::default_player().to_string()),
    );
    if !speech.available() {
        tracing::info!("no SPEECH_API_KEY configured, voice output disabled");
    }

    run_repl(&mut session, state, &speech)
        .await
        .context("REPL failed")?;

    Ok(())
}
