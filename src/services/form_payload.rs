//! 答题卡表单请求构造
//!
//! 只负责把挑战列表变成 Forms API 的 batchUpdate 请求体，不发任何网络请求。
//! 相同的挑战顺序总是得到相同的请求。

use crate::config::Config;
use crate::models::Challenge;
use serde::Serialize;

/// 表单说明文字
pub const FORM_DESCRIPTION: &str = "
WebGames is a set of online tasks that are designed to be easy for humans to do but hard for AI agents to do.

Each task will show you a password once it is successfully completed. Please attempt to complete each task, and the enter the password you get for each task into this answer sheet.

The set of 50 tasks should take 60–90 minutes to complete. If you spend more than five minutes on a single task, please move on. You can complete the tasks in any order.

The 50 tasks are available at https://webgames.convergence.ai/
";

/// 表单构造参数
#[derive(Debug, Clone)]
pub struct FormSettings {
    pub title: String,
    pub description: String,
    /// 位于第 0 题的身份题标题
    pub identifier_question: String,
    pub challenge_base_url: String,
}

impl FormSettings {
    pub fn new(config: &Config) -> Self {
        Self {
            title: config.form_title.clone(),
            description: FORM_DESCRIPTION.to_string(),
            identifier_question: config.identifier_question.clone(),
            challenge_base_url: config.challenge_base_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInfo {
    pub title: String,
    pub document_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `forms.create` 请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateFormRequest {
    pub info: FormInfo,
}

impl CreateFormRequest {
    pub fn new(title: &str) -> Self {
        Self {
            info: FormInfo {
                title: title.to_string(),
                document_title: title.to_string(),
                description: None,
            },
        }
    }
}

/// `forms.batchUpdate` 请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchUpdateRequest {
    pub requests: Vec<FormRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormRequest {
    UpdateFormInfo(UpdateFormInfo),
    CreateItem(CreateItem),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormInfo {
    pub info: FormInfo,
    pub update_mask: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateItem {
    pub item: Item,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub question_item: QuestionItem,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionItem {
    pub question: Question,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    pub text_question: TextQuestion,
}

/// 文本题，`paragraph = false` 为单行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextQuestion {
    pub paragraph: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub index: usize,
}

/// 构造 batchUpdate 请求
///
/// 顺序固定：表单信息更新 → 第 0 题身份题 → 每个挑战一题（位置从 1 开始）。
pub fn build_batch_update(settings: &FormSettings, challenges: &[Challenge]) -> BatchUpdateRequest {
    let mut requests = Vec::with_capacity(challenges.len() + 2);

    requests.push(FormRequest::UpdateFormInfo(UpdateFormInfo {
        info: FormInfo {
            title: settings.title.clone(),
            document_title: settings.title.clone(),
            description: Some(settings.description.clone()),
        },
        update_mask: "*".to_string(),
    }));

    requests.push(FormRequest::CreateItem(CreateItem {
        item: Item {
            title: settings.identifier_question.clone(),
            description: None,
            question_item: short_text_question(None),
        },
        location: Location { index: 0 },
    }));

    requests.extend(challenges.iter().enumerate().map(|(i, challenge)| {
        FormRequest::CreateItem(challenge_item(settings, challenge, i + 1))
    }));

    BatchUpdateRequest { requests }
}

fn challenge_item(settings: &FormSettings, challenge: &Challenge, index: usize) -> CreateItem {
    CreateItem {
        item: Item {
            title: challenge.title.clone(),
            description: Some(challenge.url(&settings.challenge_base_url)),
            question_item: short_text_question(Some(true)),
        },
        location: Location { index },
    }
}

fn short_text_question(required: Option<bool>) -> QuestionItem {
    QuestionItem {
        question: Question {
            required,
            text_question: TextQuestion { paragraph: false },
        },
    }
}
