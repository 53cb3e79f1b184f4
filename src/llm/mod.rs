//! LLM 层：客户端抽象与实现（OpenAI 兼容 / Mock）

pub mod mock;
pub mod openai;
pub mod traits;

use std::sync::Arc;

pub use mock::MockLlmClient;
pub use openai::{OpenAiClient, TokenUsage};
pub use traits::LlmClient;

use crate::config::{AppConfig, Credentials};

const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com/v1";

/// 按配置构建 LLM 客户端：provider 决定默认端点，base_url 可覆盖
pub fn create_llm_from_config(cfg: &AppConfig, creds: &Credentials) -> Arc<dyn LlmClient> {
    let base_url = cfg.llm.base_url.clone().or_else(|| {
        if cfg.llm.provider == "deepseek" {
            Some(DEEPSEEK_BASE_URL.to_string())
        } else {
            None
        }
    });
    Arc::new(OpenAiClient::new(
        base_url.as_deref(),
        &cfg.llm.model,
        &creds.llm_api_key,
    ))
}
