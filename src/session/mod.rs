//! 会话层：对话历史、共享会话状态与单轮调度循环

pub mod history;
pub mod state;
pub mod turn;

pub use history::{ConversationHistory, Message, Role};
pub use state::{SessionState, SharedState};
pub use turn::{build_system_prompt, parse_model_output, ModelOutput, Session, ToolCall, APOLOGY};
