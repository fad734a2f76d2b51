//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `viewer_app` - 数据集查看器
//! - 加载数据集，创建 ViewerSession
//! - 读取终端命令，驱动导航和图片选择
//! - 调用 presenter 输出当前记录
//!
//! ### `form_generator` - 答题卡生成器
//! - 加载挑战列表
//! - 获取 OAuth 令牌
//! - 创建表单并提交 batchUpdate
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator (viewer_app / form_generator)
//!     ↓
//! workflow::ViewerSession
//!     ↓
//! services (navigator / image_categorizer / presenter / form_payload)
//!     ↓
//! clients (oauth / forms_client)    models (loaders)
//! ```

pub mod form_generator;
pub mod viewer_app;

pub use form_generator::FormGenerator;
pub use viewer_app::{ViewerApp, ViewerCommand};
