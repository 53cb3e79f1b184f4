//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `LECTOR__*` 覆盖（双下划线表示嵌套，
//! 如 `LECTOR__LLM__PROVIDER=openai`）。API 凭证单独从环境变量读取并在启动时校验。

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::AgentError;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub speech: SpeechSection,
    #[serde(default)]
    pub tools: ToolsSection,
}

/// [llm] 段：后端选择与模型名
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// 后端：deepseek / openai
    pub provider: String,
    pub model: String,
    /// 覆盖 API 端点（自建代理等）；不设置时按 provider 取默认
    pub base_url: Option<String>,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "deepseek".to_string(),
            model: "deepseek-chat".to_string(),
            base_url: None,
        }
    }
}

/// [session] 段：单轮工具链上限
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// 单轮对话内模型连续请求工具的最大次数，防止无限工具循环
    pub max_tool_steps: usize,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self { max_tool_steps: 8 }
    }
}

/// [search] 段：Web 搜索请求参数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub timeout_secs: u64,
    pub max_results: usize,
    pub max_result_chars: usize,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            max_results: 5,
            max_result_chars: 4000,
        }
    }
}

/// [speech] 段：语音合成与本地播放
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechSection {
    /// 音频临时文件目录
    pub audio_dir: PathBuf,
    /// 单次合成请求的最大字符数（超出时按句切块）
    pub max_chunk_chars: usize,
    /// 合成使用的模型名（OpenAI 兼容端点）
    pub model: String,
    /// 本地播放器命令；不设置时按平台取默认（macOS: afplay，其他: mpg123）
    pub player: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SpeechSection {
    fn default() -> Self {
        Self {
            audio_dir: PathBuf::from("audio"),
            max_chunk_chars: 2500,
            model: "tts-1".to_string(),
            player: None,
            timeout_secs: 30,
        }
    }
}

/// [tools] 段：工具执行超时
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    /// 单次工具调用超时（秒）
    pub tool_timeout_secs: u64,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            tool_timeout_secs: 30,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmSection::default(),
            session: SessionSection::default(),
            search: SearchSection::default(),
            speech: SpeechSection::default(),
            tools: ToolsSection::default(),
        }
    }
}

/// 从 config 目录加载配置，环境变量 LECTOR__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 最后叠加环境变量 LECTOR__*（双下划线表示嵌套键）
pub fn load_config() -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("LECTOR")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

/// 启动凭证：LLM 与搜索的 API Key 必需，语音凭证可选（缺失时语音功能整体禁用）
#[derive(Debug, Clone)]
pub struct Credentials {
    pub llm_api_key: String,
    pub search_api_key: String,
    pub speech_api_key: Option<String>,
    pub speech_base_url: Option<String>,
}

impl Credentials {
    /// 从环境变量读取并校验；缺少必需凭证返回 ConfigError（致命）
    pub fn from_env(provider: &str) -> Result<Self, AgentError> {
        let llm_key_var = match provider {
            "openai" => "OPENAI_API_KEY",
            _ => "DEEPSEEK_API_KEY",
        };
        let llm_api_key = std::env::var(llm_key_var)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AgentError::ConfigError(format!(
                    "Missing {} (required for LLM provider '{}')",
                    llm_key_var, provider
                ))
            })?;

        let search_api_key = std::env::var("TAVILY_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AgentError::ConfigError(
                    "Missing TAVILY_API_KEY (required for web search)".to_string(),
                )
            })?;

        let speech_api_key = std::env::var("SPEECH_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let speech_base_url = std::env::var("SPEECH_BASE_URL")
            .ok()
            .filter(|k| !k.trim().is_empty());

        Ok(Self {
            llm_api_key,
            search_api_key,
            speech_api_key,
            speech_base_url,
        })
    }
}
