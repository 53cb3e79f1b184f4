//! 语音配置
//!
//! 开关 + 从固定目录中选择的音色，进程生命周期内有效，不做持久化。
//! 不变量：selected 恒为目录成员；目录外的请求不改状态并报错列出可选项。

use thiserror::Error;

/// 音色目录（名称，性别标签）；目录固定，运行时不可扩展
pub const VOICE_CATALOG: &[(&str, &str)] = &[
    ("Matthew", "male"),
    ("Joey", "male"),
    ("Brian", "male"),
    ("Russell", "male"),
    ("Joanna", "female"),
    ("Salli", "female"),
    ("Kimberly", "female"),
    ("Amy", "female"),
];

const DEFAULT_VOICE: &str = "Joanna";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VoiceError {
    #[error("Unknown voice '{requested}'. Valid voices: {catalog}")]
    UnknownVoice { requested: String, catalog: String },
}

/// voice_control 工具与 CLI 字面命令共用的命令集
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoiceCommand {
    ListVoices,
    SetVoice(String),
    Enable,
    Disable,
    Status,
}

impl VoiceCommand {
    /// 解析命令字符串：list_voices / set_voice:<name> / enable_voice / disable_voice / voice_status
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        match input {
            "list_voices" => Ok(Self::ListVoices),
            "enable_voice" => Ok(Self::Enable),
            "disable_voice" => Ok(Self::Disable),
            "voice_status" => Ok(Self::Status),
            _ => {
                if let Some(name) = input.strip_prefix("set_voice:") {
                    let name = name.trim();
                    if name.is_empty() {
                        return Err("set_voice requires a voice name".to_string());
                    }
                    Ok(Self::SetVoice(name.to_string()))
                } else {
                    Err(format!(
                        "Unknown voice_control command: '{}'. Valid commands: list_voices, \
                         set_voice:<name>, enable_voice, disable_voice, voice_status",
                        input
                    ))
                }
            }
        }
    }
}

/// 语音配置：开关与当前音色
#[derive(Clone, Debug)]
pub struct VoiceConfig {
    enabled: bool,
    selected: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selected: DEFAULT_VOICE.to_string(),
        }
    }
}

fn catalog_names() -> String {
    VOICE_CATALOG
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

impl VoiceConfig {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// 目录成员校验（大小写不敏感匹配，返回目录中的规范名）
    fn catalog_lookup(name: &str) -> Option<&'static str> {
        VOICE_CATALOG
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(n, _)| *n)
    }

    /// 执行语音命令，返回给用户/模型的确认或状态文本
    pub fn apply(&mut self, cmd: VoiceCommand) -> Result<String, VoiceError> {
        match cmd {
            VoiceCommand::ListVoices => {
                let lines: Vec<String> = VOICE_CATALOG
                    .iter()
                    .map(|(name, gender)| {
                        if *name == self.selected {
                            format!("- {} ({}) [selected]", name, gender)
                        } else {
                            format!("- {} ({})", name, gender)
                        }
                    })
                    .collect();
                Ok(format!("Available voices:\n{}", lines.join("\n")))
            }
            VoiceCommand::SetVoice(name) => match Self::catalog_lookup(&name) {
                Some(canonical) => {
                    self.selected = canonical.to_string();
                    Ok(format!("Voice set to {}", canonical))
                }
                None => Err(VoiceError::UnknownVoice {
                    requested: name,
                    catalog: catalog_names(),
                }),
            },
            VoiceCommand::Enable => {
                self.enabled = true;
                Ok("Voice output enabled".to_string())
            }
            VoiceCommand::Disable => {
                self.enabled = false;
                Ok("Voice output disabled".to_string())
            }
            VoiceCommand::Status => Ok(format!(
                "Voice output is {} (voice: {})",
                if self.enabled { "enabled" } else { "disabled" },
                self.selected
            )),
        }
    }
}
