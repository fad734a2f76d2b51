/// Forms API 客户端
///
/// 封装创建表单和批量更新两个调用。失败直接返回 `Remote` 错误，不重试。
use crate::error::{AppError, AppResult};
use crate::services::form_payload::{BatchUpdateRequest, CreateFormRequest};
use crate::utils::truncate_text;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// 表单编辑页地址
pub fn form_edit_url(form_id: &str) -> String {
    format!("https://docs.google.com/forms/d/{}/edit", form_id)
}

/// Forms API 客户端
pub struct FormsClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl FormsClient {
    /// 创建新的 Forms 客户端
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// 创建空表单
    ///
    /// # 返回
    /// 返回新表单的 formId
    pub async fn create_form(&self, request: &CreateFormRequest) -> AppResult<String> {
        let endpoint = format!("{}/forms", self.base_url);
        let result = self.post_json(&endpoint, request).await?;

        result
            .get("formId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::remote(endpoint, None, "响应中缺少 formId"))
    }

    /// 提交批量更新
    pub async fn batch_update(&self, form_id: &str, request: &BatchUpdateRequest) -> AppResult<Value> {
        let endpoint = format!("{}/forms/{}:batchUpdate", self.base_url, form_id);
        self.post_json(&endpoint, request).await
    }

    async fn post_json<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> AppResult<Value> {
        if tracing::enabled!(tracing::Level::DEBUG) {
            let payload = serde_json::to_string(body).unwrap_or_default();
            debug!("POST {} Payload: {}", endpoint, truncate_text(&payload, 500));
        }

        let response = self
            .http
            .post(endpoint)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::request_failed(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::remote(endpoint, Some(status.as_u16()), body));
        }

        let result: Value = response.json().await.map_err(|e| {
            AppError::remote(endpoint, Some(status.as_u16()), format!("响应解析失败: {}", e))
        })?;

        debug!("POST {} 结果: {}", endpoint, truncate_text(&result.to_string(), 500));

        Ok(result)
    }
}
