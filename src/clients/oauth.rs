/// OAuth 凭据客户端
///
/// 负责获取 Forms API 的访问令牌：
/// 缓存有效直接用 → 过期且有 refresh_token 则刷新 → 否则走本地回调授权流程。
use crate::config::Config;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// 申请的权限范围
pub const SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/forms",
    "https://www.googleapis.com/auth/drive",
    "https://www.googleapis.com/auth/drive.file",
];

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";

/// 令牌到期前多少秒视为已过期
const EXPIRY_SKEW_SECS: i64 = 60;

/// credentials.json 中的客户端信息
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

/// 读取客户端密钥文件（installed 或 web 类型）
pub fn load_client_secrets(path: &Path) -> AppResult<ClientSecrets> {
    if !path.exists() {
        return Err(AppError::not_found(format!(
            "{}: 无法进行 Google Forms 认证。获取凭据的方法见 \
             https://developers.google.com/forms/api/guides 和 \
             https://developers.google.com/workspace/guides/get-started",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::io(path.display().to_string(), e))?;
    let file: ClientSecretsFile = serde_json::from_str(&content)
        .map_err(|e| AppError::format(path.display().to_string(), e.to_string()))?;

    file.installed.or(file.web).ok_or_else(|| {
        AppError::format(
            path.display().to_string(),
            "缺少 installed 或 web 客户端配置",
        )
    })
}

/// 缓存的访问令牌
///
/// 同时保存刷新所需的客户端信息，缓存存在时刷新不依赖 credentials.json。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
}

impl StoredToken {
    /// 距离过期还有一分钟以上才算有效
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now + Duration::seconds(EXPIRY_SKEW_SECS)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

/// 令牌缓存文件
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 读取缓存，文件不存在时返回 None
    pub fn load(&self) -> AppResult<Option<StoredToken>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| AppError::io(self.path.display().to_string(), e))?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| AppError::auth(format!("令牌缓存 {} 无法解析: {}", self.path.display(), e)))
    }

    pub fn save(&self, token: &StoredToken) -> AppResult<()> {
        let content = serde_json::to_string_pretty(token)
            .map_err(|e| AppError::auth(format!("令牌序列化失败: {}", e)))?;
        std::fs::write(&self.path, content)
            .map_err(|e| AppError::io(self.path.display().to_string(), e))
    }
}

/// 令牌端点响应
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
}

fn default_expires_in() -> i64 {
    3600
}

/// OAuth 客户端
pub struct OAuthClient {
    http: reqwest::Client,
    default_token_uri: String,
}

impl OAuthClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            default_token_uri: config.oauth_token_url.clone(),
        }
    }

    /// 获取可用的访问令牌，并写回缓存
    ///
    /// # 错误
    /// - 缓存不可用且缺少 credentials.json: `NotFound`
    /// - 刷新或授权失败: `Auth`
    pub async fn obtain_token(&self, cache: &TokenCache, credentials_file: &Path) -> AppResult<StoredToken> {
        let cached = cache.load()?;

        if let Some(token) = &cached {
            if token.is_valid() {
                debug!("使用缓存的访问令牌");
                return Ok(token.clone());
            }
        }

        let token = match cached {
            Some(expired) if expired.refresh_token.is_some() => {
                info!("🔄 访问令牌已过期，正在刷新...");
                self.refresh(&expired).await?
            }
            _ => {
                let secrets = load_client_secrets(credentials_file)?;
                self.authorize_installed_app(&secrets).await?
            }
        };

        cache.save(&token)?;
        Ok(token)
    }

    /// 用 refresh_token 换新的访问令牌
    pub async fn refresh(&self, token: &StoredToken) -> AppResult<StoredToken> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| AppError::auth("缺少 refresh_token，无法刷新"))?;

        let response = self
            .request_token(
                &token.token_uri,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token),
                    ("client_id", token.client_id.as_str()),
                    ("client_secret", token.client_secret.as_str()),
                ],
            )
            .await?;

        Ok(StoredToken {
            access_token: response.access_token,
            // 刷新响应通常不带新的 refresh_token
            refresh_token: response.refresh_token.or_else(|| token.refresh_token.clone()),
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
            token_uri: token.token_uri.clone(),
            client_id: token.client_id.clone(),
            client_secret: token.client_secret.clone(),
        })
    }

    /// 本地回调授权流程
    ///
    /// 在 127.0.0.1 的随机端口监听，输出授权链接，等待浏览器带着 code 回调一次。
    pub async fn authorize_installed_app(&self, secrets: &ClientSecrets) -> AppResult<StoredToken> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| AppError::auth(format!("无法监听本地回调端口: {}", e)))?;
        let port = listener
            .local_addr()
            .map_err(|e| AppError::auth(format!("无法获取本地端口: {}", e)))?
            .port();
        let redirect_uri = format!("http://127.0.0.1:{}/", port);

        let auth_url = build_authorization_url(secrets, &redirect_uri)?;
        info!("请在浏览器中打开以下链接完成授权:\n{}", auth_url);

        let code = wait_for_authorization_code(&listener).await?;
        debug!("已收到授权码");

        let token_uri = secrets
            .token_uri
            .clone()
            .unwrap_or_else(|| self.default_token_uri.clone());

        let response = self
            .request_token(
                &token_uri,
                &[
                    ("grant_type", "authorization_code"),
                    ("code", code.as_str()),
                    ("client_id", secrets.client_id.as_str()),
                    ("client_secret", secrets.client_secret.as_str()),
                    ("redirect_uri", redirect_uri.as_str()),
                ],
            )
            .await?;

        info!("✓ 授权成功");

        Ok(StoredToken {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
            token_uri,
            client_id: secrets.client_id.clone(),
            client_secret: secrets.client_secret.clone(),
        })
    }

    async fn request_token(&self, token_uri: &str, params: &[(&str, &str)]) -> AppResult<TokenResponse> {
        let response = self
            .http
            .post(token_uri)
            .form(params)
            .send()
            .await
            .map_err(|e| AppError::auth(format!("令牌请求失败 ({}): {}", token_uri, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("令牌端点返回错误: HTTP {}", status);
            return Err(AppError::auth(format!(
                "令牌端点返回 HTTP {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::auth(format!("令牌响应解析失败: {}", e)))
    }
}

/// 构造授权链接
pub fn build_authorization_url(secrets: &ClientSecrets, redirect_uri: &str) -> AppResult<url::Url> {
    let scope = SCOPES.join(" ");
    url::Url::parse_with_params(
        &secrets.auth_uri,
        &[
            ("client_id", secrets.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )
    .map_err(|e| AppError::auth(format!("无效的 auth_uri {}: {}", secrets.auth_uri, e)))
}

/// 接收一次浏览器回调，返回授权码
async fn wait_for_authorization_code(listener: &TcpListener) -> AppResult<String> {
    let (mut stream, _) = listener
        .accept()
        .await
        .map_err(|e| AppError::auth(format!("等待授权回调失败: {}", e)))?;

    let mut request_line = String::new();
    {
        let mut reader = BufReader::new(&mut stream);
        reader
            .read_line(&mut request_line)
            .await
            .map_err(|e| AppError::auth(format!("读取授权回调失败: {}", e)))?;
    }

    let result = parse_callback(&request_line);

    let body = match &result {
        Ok(_) => "The authentication flow has completed. You may close this window.",
        Err(_) => "Authentication failed. Check the terminal for details.",
    };
    let reply = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = stream.write_all(reply.as_bytes()).await;
    let _ = stream.shutdown().await;

    result
}

/// 解析回调请求行，例如 `GET /?code=abc&scope=... HTTP/1.1`
pub fn parse_callback(request_line: &str) -> AppResult<String> {
    let target = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| AppError::auth(format!("无效的回调请求: {}", request_line.trim())))?;

    let callback = url::Url::parse(&format!("http://127.0.0.1{}", target))
        .map_err(|e| AppError::auth(format!("无效的回调地址 {}: {}", target, e)))?;

    let mut code = None;
    let mut error = None;
    for (key, value) in callback.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    match (code, error) {
        (Some(code), _) => Ok(code),
        (None, Some(error)) => Err(AppError::auth(format!("用户拒绝授权: {}", error))),
        (None, None) => Err(AppError::auth("回调中缺少授权码")),
    }
}
