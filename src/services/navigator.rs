//! 导航服务 - 业务能力层
//!
//! 只负责"当前是第几条"，不关心记录内容

/// 记录导航器
///
/// `len` 在加载时确定。所有操作都把索引限制在 `[0, len-1]` 内，
/// 空数据集时索引恒为 0。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    current_index: usize,
    len: usize,
}

impl Navigator {
    pub fn new(len: usize) -> Self {
        Self {
            current_index: 0,
            len,
        }
    }

    /// 当前索引（从0开始）
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn last_index(&self) -> usize {
        self.len.saturating_sub(1)
    }

    pub fn has_previous(&self) -> bool {
        self.current_index > 0
    }

    pub fn has_next(&self) -> bool {
        self.current_index < self.last_index()
    }

    /// 上一条，在 0 处停住
    pub fn previous(&mut self) -> usize {
        self.current_index = self.current_index.saturating_sub(1);
        self.current_index
    }

    /// 下一条，在最后一条处停住
    pub fn next(&mut self) -> usize {
        self.current_index = (self.current_index + 1).min(self.last_index());
        self.current_index
    }

    /// 跳转到第 `line` 条（从1开始）
    ///
    /// 超出 `[1, len]` 的输入会被限制到最近的合法位置，
    /// 调用方不需要事先校验。
    pub fn jump(&mut self, line: usize) -> usize {
        self.current_index = line.saturating_sub(1).min(self.last_index());
        self.current_index
    }
}
