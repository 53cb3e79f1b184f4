//! Lector - 语音文档教师 CLI
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）与启动凭证校验
//! - **document**: 文档存储、阅读游标与解析器接口（PDF / DOCX）
//! - **voice**: 语音配置（开关 + 固定音色目录）
//! - **speech**: 语音播报（分句切块、合成、外部播放器进程）
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / Mock）
//! - **tools**: 工具箱（document_loader、page_reader、voice_control、web_search）与执行器
//! - **session**: 对话历史（精确回滚）与单轮工具调度循环
//! - **repl**: 交互式命令行入口（字面命令 + 模型转发）

pub mod config;
pub mod document;
pub mod error;
pub mod llm;
pub mod repl;
pub mod session;
pub mod speech;
pub mod tools;
pub mod voice;

pub use error::AgentError;
