use thiserror::Error;

/// 应用程序错误类型
///
/// 所有错误都直接上抛给操作者，不做自动重试。
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件或凭据不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },

    /// 扩展名不对，或记录结构不合法
    #[error("格式错误 ({context}): {message}")]
    Format { context: String, message: String },

    /// 某一行不是合法的 JSON
    #[error("JSON解析失败 ({path} 第 {line} 行): {source}")]
    Parse {
        path: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// 凭据刷新或 OAuth 流程失败
    #[error("认证失败: {message}")]
    Auth { message: String },

    /// 远程 API 调用失败
    #[error("API请求失败 ({endpoint}): status={status:?}, {message}")]
    Remote {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    /// 读写文件失败
    #[error("文件读写失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置错误
    #[error("配置错误: {message}")]
    Config { message: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    pub fn not_found(path: impl Into<String>) -> Self {
        AppError::NotFound { path: path.into() }
    }

    pub fn format(context: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Format {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        AppError::Auth {
            message: message.into(),
        }
    }

    /// 创建远程调用错误
    pub fn remote(endpoint: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        AppError::Remote {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// 网络层失败（没有拿到 HTTP 状态码）
    pub fn request_failed(endpoint: impl Into<String>, err: reqwest::Error) -> Self {
        AppError::Remote {
            endpoint: endpoint.into(),
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
