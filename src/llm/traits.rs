//! LLM 客户端抽象
//!
//! 会话按轮阻塞调用，不需要流式；所有后端实现 complete（整段历史进，整段文本出）。

use async_trait::async_trait;

use crate::session::Message;

/// LLM 客户端 trait：非流式完成；失败原因以字符串返回，由会话层转 AgentError
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, String>;

    /// 获取累计 token 使用统计：(prompt_tokens, completion_tokens, total_tokens)
    /// 默认返回 (0, 0, 0)，具体实现可覆盖
    fn token_usage(&self) -> (u64, u64, u64) {
        (0, 0, 0)
    }
}
