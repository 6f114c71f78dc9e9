use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 题库、历史记录、收藏的存放目录
    pub data_dir: String,
    /// 每次测试/练习的题目数量
    pub session_size: usize,
    /// 题库最多保存的文件数
    pub library_limit: usize,
    /// 最多保存的历史记录数
    pub history_limit: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: ".quiz_master".to_string(),
            session_size: 25,
            library_limit: 10,
            history_limit: 20,
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
        }
    }
}

impl Config {
    /// 仅从环境变量加载（未设置的项使用默认值）
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，文件不存在时使用默认值，最后应用环境变量覆盖
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let base = if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
                    path: path.display().to_string(),
                    source,
                })?;
            Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            })?
        } else {
            tracing::debug!("配置文件不存在，使用默认配置: {}", path.display());
            Self::default()
        };

        Ok(base.with_env_overrides())
    }

    /// 解析 TOML 配置内容
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            data_dir: std::env::var("QUIZ_DATA_DIR").unwrap_or(self.data_dir),
            session_size: env_parse("QUIZ_SESSION_SIZE", self.session_size),
            library_limit: env_parse("QUIZ_LIBRARY_LIMIT", self.library_limit),
            history_limit: env_parse("QUIZ_HISTORY_LIMIT", self.history_limit),
            verbose_logging: env_parse("VERBOSE_LOGGING", self.verbose_logging),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
        }
    }
}

/// 读取并解析环境变量，缺失或无法解析时使用默认值
fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
