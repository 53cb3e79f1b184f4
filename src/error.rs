//! Agent 错误类型
//!
//! 只有 ConfigError 是致命的（启动时校验凭证失败即退出）；
//! 其余错误均在会话内恢复：LlmError 触发本轮历史回滚，工具错误作为文本回传给模型。

use thiserror::Error;

/// 会话运行过程中可能出现的错误（配置、LLM、工具）
#[derive(Error, Debug)]
pub enum AgentError {
    /// 启动期配置/凭证缺失，进程直接退出
    #[error("Config error: {0}")]
    ConfigError(String),

    /// 模型调用失败（网络 / 认证）；调用方回滚本轮历史并显示固定致歉语
    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Tool execution failed: {0}")]
    ToolExecutionFailed(String),

    #[error("Tool timeout: {0}")]
    ToolTimeout(String),

    /// 模型请求了未注册的工具名
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}
