//! 会话状态
//!
//! 文档存储与语音配置由会话对象显式持有（不是模块级全局量），
//! 通过 Arc<Mutex<_>> 与工具对象共享。锁只在同步段内持有，从不跨 await。

use std::sync::{Arc, Mutex};

use crate::document::{DocumentParser, DocumentStore};
use crate::voice::VoiceConfig;

/// 单个会话独占的可变状态
pub struct SessionState {
    pub document: DocumentStore,
    pub voice: VoiceConfig,
}

pub type SharedState = Arc<Mutex<SessionState>>;

impl SessionState {
    pub fn new(parser: Arc<dyn DocumentParser>) -> Self {
        Self {
            document: DocumentStore::new(parser),
            voice: VoiceConfig::default(),
        }
    }

    pub fn shared(parser: Arc<dyn DocumentParser>) -> SharedState {
        Arc::new(Mutex::new(Self::new(parser)))
    }
}
