//! Mock LLM 客户端（用于测试，无需 API）
//!
//! 按脚本依次返回预设回复（或失败），便于本地验证工具调度与回滚逻辑。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::LlmClient;
use crate::session::Message;

/// Mock 客户端：每次 complete 弹出下一条脚本回复
#[derive(Debug, Default)]
pub struct MockLlmClient {
    script: Mutex<VecDeque<Result<String, String>>>,
}

impl MockLlmClient {
    /// 按顺序返回给定回复，脚本用尽后返回固定文本
    pub fn with_responses(responses: Vec<&str>) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().map(|s| Ok(s.to_string())).collect()),
        }
    }

    /// 按顺序返回给定结果（可混合成功与失败）
    pub fn with_script(script: Vec<Result<String, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }

    /// 每次调用都失败
    pub fn failing(reason: &str) -> Self {
        Self::with_script(vec![Err(reason.to_string())])
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _messages: &[Message]) -> Result<String, String> {
        let mut script = self.script.lock().expect("mock script lock");
        match script.pop_front() {
            Some(entry) => {
                // failing(): 脚本尽后继续失败
                if script.is_empty() && entry.is_err() {
                    script.push_back(entry.clone());
                }
                entry
            }
            None => Ok("(no scripted response)".to_string()),
        }
    }
}
