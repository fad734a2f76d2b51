use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::path::Path;

/// 默认配置文件名
pub const CONFIG_FILE: &str = "webgames.toml";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 查看器默认打开的数据集
    pub default_dataset_path: String,
    /// 挑战列表文件（JSON-Lines）
    pub challenges_file: String,
    /// OAuth 客户端密钥文件
    pub credentials_file: String,
    /// OAuth 令牌缓存文件
    pub token_cache_file: String,
    /// 挑战页面的基础 URL，题目描述 = 基础URL + path
    pub challenge_base_url: String,
    // --- Forms API 配置 ---
    pub forms_api_base_url: String,
    /// credentials.json 未给出 token_uri 时使用
    pub oauth_token_url: String,
    pub form_title: String,
    pub identifier_question: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_dataset_path:
                "../datasets/frog-crossing/frog-crossing_20250602T182716/dataset.jsonl".to_string(),
            challenges_file: "webgames-v0-challenges.jsonl".to_string(),
            credentials_file: "credentials.json".to_string(),
            token_cache_file: "token.json".to_string(),
            challenge_base_url: "https://webgames.convergence.ai/".to_string(),
            forms_api_base_url: "https://forms.googleapis.com/v1".to_string(),
            oauth_token_url: "https://oauth2.googleapis.com/token".to_string(),
            form_title: "WebGames answer sheet".to_string(),
            identifier_question: "Your Prolific ID:".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 默认值 + 环境变量
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 默认值 + 配置文件（存在时）+ 环境变量
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::from_env());
        }
        Ok(Self::from_toml_file(path)?.with_env_overrides())
    }

    /// 从 TOML 文件读取，缺省字段取默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::io(path.display().to_string(), e))?;
        toml::from_str(&content).map_err(|e| AppError::Config {
            message: format!("无法解析配置文件 {}: {}", path.display(), e),
        })
    }

    fn with_env_overrides(self) -> Self {
        Self {
            default_dataset_path: std::env::var("DATASET_PATH").unwrap_or(self.default_dataset_path),
            challenges_file: std::env::var("CHALLENGES_FILE").unwrap_or(self.challenges_file),
            credentials_file: std::env::var("CREDENTIALS_FILE").unwrap_or(self.credentials_file),
            token_cache_file: std::env::var("TOKEN_CACHE_FILE").unwrap_or(self.token_cache_file),
            challenge_base_url: std::env::var("CHALLENGE_BASE_URL").unwrap_or(self.challenge_base_url),
            forms_api_base_url: std::env::var("FORMS_API_BASE_URL").unwrap_or(self.forms_api_base_url),
            oauth_token_url: std::env::var("OAUTH_TOKEN_URL").unwrap_or(self.oauth_token_url),
            form_title: std::env::var("FORM_TITLE").unwrap_or(self.form_title),
            identifier_question: std::env::var("IDENTIFIER_QUESTION").unwrap_or(self.identifier_question),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }
}
