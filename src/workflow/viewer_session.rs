//! 查看会话
//!
//! 封装"当前看的是第几条、选中了哪张图"这一可变状态。
//! 记录本身只读；每次切换记录都把选中图片重置为该记录的初始图片。

use crate::error::{AppError, AppResult};
use crate::models::{Dataset, EpisodeRecord, TaskKind};
use crate::services::image_categorizer::{categorize, ImagePartition, ImageRole};
use crate::services::Navigator;
use std::path::PathBuf;
use tracing::debug;

/// 当前选中的图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSelection {
    pub role: ImageRole,
    /// 已解析到数据集目录下的路径
    pub path: PathBuf,
}

/// 查看会话
#[derive(Debug)]
pub struct ViewerSession {
    kind: TaskKind,
    dataset: Dataset,
    navigator: Navigator,
    selection: Option<ImageSelection>,
    /// 是否展示完整 JSON
    pub show_json: bool,
}

impl ViewerSession {
    /// 创建会话，停在第一条记录
    ///
    /// 空数据集无法浏览，返回 `Format` 错误。
    pub fn new(kind: TaskKind, dataset: Dataset) -> AppResult<Self> {
        if dataset.is_empty() {
            return Err(AppError::format(
                dataset.path.display().to_string(),
                "数据集中没有任何记录",
            ));
        }

        let navigator = Navigator::new(dataset.len());
        let mut session = Self {
            kind,
            dataset,
            navigator,
            selection: None,
            show_json: false,
        };
        session.reset_selection();
        Ok(session)
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// 当前记录
    pub fn current(&self) -> &EpisodeRecord {
        // 构造时已保证非空，导航器的索引始终在范围内
        &self.dataset.records[self.navigator.current_index()]
    }

    /// 当前记录的图片划分
    pub fn partition(&self) -> AppResult<ImagePartition> {
        categorize(self.kind, &self.current().images)
    }

    pub fn selection(&self) -> Option<&ImageSelection> {
        self.selection.as_ref()
    }

    pub fn previous(&mut self) -> usize {
        self.navigator.previous();
        self.reset_selection();
        self.navigator.current_index()
    }

    pub fn next(&mut self) -> usize {
        self.navigator.next();
        self.reset_selection();
        self.navigator.current_index()
    }

    /// 跳转到第 `line` 条（从1开始，超出范围时限制到边界）
    pub fn jump(&mut self, line: usize) -> usize {
        self.navigator.jump(line);
        self.reset_selection();
        self.navigator.current_index()
    }

    /// 选中当前记录的某张图片
    pub fn select(&mut self, role: ImageRole) -> AppResult<&ImageSelection> {
        let partition = self.partition()?;
        let relative = partition.get(role).ok_or_else(|| {
            AppError::format(
                format!("第 {} 条记录", self.navigator.current_index() + 1),
                format!("没有角色为 {} 的图片", role),
            )
        })?;

        debug!("选中图片: {} -> {}", role, relative);

        let path = self.dataset.resolve_image(relative);
        let selection = self.selection.insert(ImageSelection { role, path });
        Ok(&*selection)
    }

    // 直接取第一张图，瓢虫图片不足三张时也能显示
    fn reset_selection(&mut self) {
        let first = self.current().images.first().map(|p| self.dataset.resolve_image(p));
        self.selection = first.map(|path| ImageSelection {
            role: ImageRole::Initial,
            path,
        });
    }
}
