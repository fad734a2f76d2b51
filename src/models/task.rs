use crate::error::AppError;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// 任务类型
///
/// 三种任务的数据集格式一致，只有图片分类和展示字段不同。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// 青蛙过河
    FrogCrossing,
    /// 瓢虫路径规划
    Ladybird,
    /// 地图平移
    MapPanner,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [TaskKind::FrogCrossing, TaskKind::Ladybird, TaskKind::MapPanner];

    /// 命令行 / 目录名中使用的标识
    pub fn slug(self) -> &'static str {
        match self {
            TaskKind::FrogCrossing => "frog-crossing",
            TaskKind::Ladybird => "ladybird",
            TaskKind::MapPanner => "map-panner",
        }
    }

    /// 展示用标题
    pub fn title(self) -> &'static str {
        match self {
            TaskKind::FrogCrossing => "Frog Crossing",
            TaskKind::Ladybird => "Ladybird",
            TaskKind::MapPanner => "Map Panner",
        }
    }

    /// 从数据集路径推断任务类型
    ///
    /// 数据集通常放在 `datasets/<task>/<task>_<时间戳>/dataset.jsonl` 下，
    /// 取第一个包含任务标识的路径分量。
    pub fn from_dataset_path(path: &Path) -> Option<Self> {
        path.components().find_map(|component| {
            let name = component.as_os_str().to_string_lossy().to_lowercase();
            Self::ALL.into_iter().find(|kind| name.contains(kind.slug()))
        })
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for TaskKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "frog-crossing" | "frog" => Ok(TaskKind::FrogCrossing),
            "ladybird" => Ok(TaskKind::Ladybird),
            "map-panner" | "map" => Ok(TaskKind::MapPanner),
            other => Err(AppError::format(
                "任务类型",
                format!("未知的任务类型 '{}'，可选: frog-crossing / ladybird / map-panner", other),
            )),
        }
    }
}
