//! 语音播报
//!
//! speak 对调用方永不报错：语音是非必需的增强，任何失败都降级为静默 no-op，
//! 但降级原因通过 SpeechOutcome 显式暴露，便于测试与日志。
//! 块按序合成、落盘、播放；播放完成后删除临时文件（有意偏离参考行为的泄漏）。

pub mod chunk;
pub mod player;
pub mod synth;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use chunk::chunk_text;
pub use synth::{HttpSynthesizer, SpeechSynthesizer};

use crate::voice::VoiceConfig;

/// 播报结果：实际播放的块数，或带原因的跳过
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechOutcome {
    Played { chunks: usize },
    Skipped(SkipReason),
}

/// 跳过播报的原因
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// 语音配置关闭
    Disabled,
    /// 未配置合成凭证，组件整体为 no-op
    NoCredentials,
    /// 文本为空，无可播内容
    EmptyText,
    /// 合成请求失败
    SynthesisFailed(String),
    /// 播放器启动/退出失败
    PlayerFailed(String),
}

/// 语音播报组件
pub struct SpeechOutput {
    /// None 表示无凭证，speak 恒为 Skipped(NoCredentials)
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    audio_dir: PathBuf,
    max_chunk_chars: usize,
    player: String,
    /// 播放器故障只告警一次，之后静默
    player_warned: AtomicBool,
}

impl SpeechOutput {
    pub fn new(
        synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
        audio_dir: PathBuf,
        max_chunk_chars: usize,
        player: String,
    ) -> Self {
        Self {
            synthesizer,
            audio_dir,
            max_chunk_chars,
            player,
            player_warned: AtomicBool::new(false),
        }
    }

    /// 组件是否具备合成能力（凭证已配置）
    pub fn available(&self) -> bool {
        self.synthesizer.is_some()
    }

    /// 朗读文本：按句切块，逐块合成并播放。永不向调用方传播错误。
    pub async fn speak(&self, text: &str, voice: &VoiceConfig) -> SpeechOutcome {
        if !voice.enabled() {
            return SpeechOutcome::Skipped(SkipReason::Disabled);
        }
        let Some(synthesizer) = self.synthesizer.as_ref() else {
            return SpeechOutcome::Skipped(SkipReason::NoCredentials);
        };

        let chunks = chunk_text(text, self.max_chunk_chars);
        if chunks.is_empty() {
            return SpeechOutcome::Skipped(SkipReason::EmptyText);
        }

        if let Err(e) = std::fs::create_dir_all(&self.audio_dir) {
            tracing::warn!(error = %e, "cannot create audio dir, skipping speech");
            return SpeechOutcome::Skipped(SkipReason::PlayerFailed(e.to_string()));
        }

        let mut played = 0usize;
        for chunk in &chunks {
            let audio = match synthesizer.synthesize(chunk, voice.selected()).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, "speech synthesis failed, skipping remainder");
                    return SpeechOutcome::Skipped(SkipReason::SynthesisFailed(e));
                }
            };

            let path = self.audio_dir.join(format!("{}.mp3", uuid::Uuid::new_v4()));
            if let Err(e) = std::fs::write(&path, &audio) {
                tracing::warn!(error = %e, "cannot write audio chunk, skipping remainder");
                return SpeechOutcome::Skipped(SkipReason::PlayerFailed(e.to_string()));
            }

            let result = player::play_file(&self.player, &path).await;
            // 播放完即清理，不积累临时音频
            let _ = std::fs::remove_file(&path);

            if let Err(e) = result {
                if !self.player_warned.swap(true, Ordering::Relaxed) {
                    tracing::warn!(error = %e, "audio playback failed, voice output degraded");
                }
                return SpeechOutcome::Skipped(SkipReason::PlayerFailed(e));
            }
            played += 1;
        }
        SpeechOutcome::Played { chunks: played }
    }
}
