//! 对话历史
//!
//! 会话内只追加；唯一的例外是模型调用失败时按快照精确回滚，
//! 使失败的一轮在历史中不留任何痕迹。

use serde::{Deserialize, Serialize};

/// 消息角色（与 LLM API 一致；Tool 为工具结果回传）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// 单条消息
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
        }
    }
}

/// 对话历史：仅会话本体持有，其他组件不读不写
#[derive(Clone, Debug, Default)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// 回滚用快照：记录当前长度
    pub fn snapshot(&self) -> usize {
        self.messages.len()
    }

    /// 回滚到快照处，丢弃其后追加的所有消息
    pub fn rollback_to(&mut self, snapshot: usize) {
        self.messages.truncate(snapshot);
    }
}
