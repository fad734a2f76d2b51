//! # WebGames Tools
//!
//! WebGames 数据集查看与答题卡生成工具
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - 回合记录、挑战定义、任务类型
//! - `models/loaders` - JSON-Lines 加载器，整体成功或整体失败
//!
//! ### ② 业务能力层（Services）
//! - `Navigator` - 上一条 / 下一条 / 跳转，索引始终在范围内
//! - `image_categorizer` - 按任务类型划分图片角色
//! - `presenter` - 把当前记录渲染成文本
//! - `form_payload` - 构造答题卡的 batchUpdate 请求
//!
//! ### ③ 会话层（Workflow）
//! - `ViewerSession` - 当前索引 + 选中图片，显式传递，不使用全局状态
//!
//! ### ④ 外部接口（Clients）
//! - `OAuthClient` - 令牌缓存 / 刷新 / 本地回调授权
//! - `FormsClient` - 创建表单、批量更新
//!
//! ### ⑤ 编排层（Orchestration）
//! - `ViewerApp` - 终端查看器
//! - `FormGenerator` - 答题卡生成流程

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Challenge, Dataset, EpisodeRecord, TaskKind};
pub use orchestrator::{FormGenerator, ViewerApp};
pub use services::{categorize, ImagePartition, ImageRole, Navigator};
pub use workflow::ViewerSession;
