//! 答题卡生成器 - 编排层
//!
//! 一次性流程：加载挑战 → 获取令牌 → 创建表单 → batchUpdate。
//! 任一步失败即终止，不重试，也不回滚已创建的表单。

use crate::clients::forms_client::form_edit_url;
use crate::clients::{FormsClient, OAuthClient, TokenCache};
use crate::config::Config;
use crate::models::{load_challenges, Challenge};
use crate::services::form_payload::{build_batch_update, CreateFormRequest, FormSettings};
use crate::utils::logging::log_form_created;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// 答题卡生成器
pub struct FormGenerator {
    config: Config,
}

impl FormGenerator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 运行完整流程
    ///
    /// # 返回
    /// 返回新表单的 formId
    pub async fn run(&self) -> Result<String> {
        let challenges = self.load_challenges()?;

        let oauth = OAuthClient::new(&self.config);
        let cache = TokenCache::new(&self.config.token_cache_file);
        let token = oauth
            .obtain_token(&cache, Path::new(&self.config.credentials_file))
            .await
            .context("获取 Google 凭据失败")?;

        self.submit(&token.access_token, &challenges).await
    }

    fn load_challenges(&self) -> Result<Vec<Challenge>> {
        info!("\n📁 正在加载挑战列表: {}", self.config.challenges_file);
        let challenges = load_challenges(Path::new(&self.config.challenges_file))
            .with_context(|| format!("无法加载挑战列表: {}", self.config.challenges_file))?;
        info!("✓ 找到 {} 个挑战", challenges.len());
        Ok(challenges)
    }

    /// 用已有的访问令牌创建表单并写入题目
    pub async fn submit(&self, access_token: &str, challenges: &[Challenge]) -> Result<String> {
        let client = FormsClient::new(&self.config.forms_api_base_url, access_token);

        let form_id = client
            .create_form(&CreateFormRequest::new(&self.config.form_title))
            .await
            .context("创建表单失败")?;
        info!("✓ 已创建空表单: {}", form_id);

        let payload = build_batch_update(&FormSettings::new(&self.config), challenges);
        info!("📝 正在写入 {} 个更新请求...", payload.requests.len());

        client
            .batch_update(&form_id, &payload)
            .await
            .with_context(|| format!("写入表单内容失败 (表单 {})", form_edit_url(&form_id)))?;

        log_form_created(&form_id, challenges.len());
        Ok(form_id)
    }
}
