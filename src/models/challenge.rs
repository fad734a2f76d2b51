use serde::{Deserialize, Serialize};

/// 挑战定义（答题卡中的一道题）
///
/// 例：
/// `{"id":"date","title":"Today's date","description":"Enter today's date","path":"date","password":"DATE_MASTER_2024","tags":["form","date"]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub path: String,
    pub password: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Challenge {
    /// 挑战页面地址 = 基础 URL + path（直接拼接）
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self.path)
    }
}
