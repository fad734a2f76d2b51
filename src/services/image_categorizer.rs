//! 图片分类服务 - 业务能力层
//!
//! 把一条记录的 `images` 按任务类型划分为初始 / 中间步骤 / 最终等角色。
//! 纯函数：只读 `images`，不修改记录。

use crate::error::{AppError, AppResult};
use crate::models::TaskKind;
use std::fmt;

/// 地图平移中间步骤的文件名标记（不区分大小写）
pub const PAN_MARKER: &str = "_pan_";

/// 图片角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageRole {
    Initial,
    /// 青蛙过河：开始移动后的第一张
    Started,
    Final,
    /// 瓢虫：输入路径后的画面
    Sequence,
    /// 瓢虫：执行结果
    Result,
    /// 地图平移：找到目标时的画面
    Found,
    /// 青蛙过河中间移动（组内索引，从0开始）
    Movement(usize),
    /// 地图平移中间平移步骤（组内索引，从0开始）
    PanOperation(usize),
}

impl ImageRole {
    /// 按名称和可选的组内索引解析角色
    pub fn parse(name: &str, index: Option<usize>) -> Option<Self> {
        match (name.to_lowercase().as_str(), index) {
            ("initial", _) => Some(ImageRole::Initial),
            ("started", _) => Some(ImageRole::Started),
            ("final", _) => Some(ImageRole::Final),
            ("sequence", _) => Some(ImageRole::Sequence),
            ("result", _) => Some(ImageRole::Result),
            ("found", _) => Some(ImageRole::Found),
            ("movements" | "movement" | "move", Some(i)) => Some(ImageRole::Movement(i)),
            ("pan_operations" | "pan" | "pan_operation", Some(i)) => Some(ImageRole::PanOperation(i)),
            _ => None,
        }
    }
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRole::Initial => f.write_str("initial"),
            ImageRole::Started => f.write_str("started"),
            ImageRole::Final => f.write_str("final"),
            ImageRole::Sequence => f.write_str("sequence"),
            ImageRole::Result => f.write_str("result"),
            ImageRole::Found => f.write_str("found"),
            // 对外序号从1开始，与 `s move N` 命令一致
            ImageRole::Movement(i) => write!(f, "move {}", i + 1),
            ImageRole::PanOperation(i) => write!(f, "pan {}", i + 1),
        }
    }
}

/// 图片角色划分
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePartition {
    FrogCrossing {
        initial: Option<String>,
        started: Option<String>,
        final_image: Option<String>,
        movements: Vec<String>,
    },
    /// 固定三张，不足三张时分类失败
    Ladybird {
        initial: String,
        sequence: String,
        result: String,
    },
    MapPanner {
        initial: Option<String>,
        found: Option<String>,
        pan_operations: Vec<String>,
    },
}

/// 一个可选中的缩略图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlot<'a> {
    pub role: ImageRole,
    pub label: String,
    pub path: &'a str,
}

/// 按任务类型划分图片
///
/// # 错误
/// 瓢虫任务图片少于三张时返回 `Format` 错误；其余任务对任意输入（包括空列表）都成功。
pub fn categorize(kind: TaskKind, images: &[String]) -> AppResult<ImagePartition> {
    match kind {
        TaskKind::FrogCrossing => Ok(categorize_frog_crossing(images)),
        TaskKind::Ladybird => categorize_ladybird(images),
        TaskKind::MapPanner => Ok(categorize_map_panner(images)),
    }
}

fn categorize_frog_crossing(images: &[String]) -> ImagePartition {
    let has_two = images.len() >= 2;
    let movements = if images.len() > 3 {
        images[2..images.len() - 1].to_vec()
    } else {
        Vec::new()
    };

    ImagePartition::FrogCrossing {
        initial: images.first().cloned(),
        started: if has_two { images.get(1).cloned() } else { None },
        final_image: if has_two { images.last().cloned() } else { None },
        movements,
    }
}

fn categorize_ladybird(images: &[String]) -> AppResult<ImagePartition> {
    match images {
        [initial, sequence, result, ..] => Ok(ImagePartition::Ladybird {
            initial: initial.clone(),
            sequence: sequence.clone(),
            result: result.clone(),
        }),
        _ => Err(AppError::format(
            "ladybird 图片",
            format!("需要至少 3 张图片，实际 {} 张", images.len()),
        )),
    }
}

// 不含平移标记的中间图片直接丢弃
fn categorize_map_panner(images: &[String]) -> ImagePartition {
    let pan_operations = if images.len() > 2 {
        images[1..images.len() - 1]
            .iter()
            .filter(|path| file_name(path).to_lowercase().contains(PAN_MARKER))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    ImagePartition::MapPanner {
        initial: images.first().cloned(),
        found: if images.len() >= 2 { images.last().cloned() } else { None },
        pan_operations,
    }
}

impl ImagePartition {
    /// 初始图片（切换记录后默认选中）
    pub fn initial(&self) -> Option<&str> {
        self.get(ImageRole::Initial)
    }

    /// 取某个角色对应的图片
    pub fn get(&self, role: ImageRole) -> Option<&str> {
        match (self, role) {
            (ImagePartition::FrogCrossing { initial, .. }, ImageRole::Initial)
            | (ImagePartition::MapPanner { initial, .. }, ImageRole::Initial) => initial.as_deref(),
            (ImagePartition::FrogCrossing { started, .. }, ImageRole::Started) => started.as_deref(),
            (ImagePartition::FrogCrossing { final_image, .. }, ImageRole::Final) => final_image.as_deref(),
            (ImagePartition::FrogCrossing { movements, .. }, ImageRole::Movement(i)) => {
                movements.get(i).map(String::as_str)
            }
            (ImagePartition::Ladybird { initial, .. }, ImageRole::Initial) => Some(initial.as_str()),
            (ImagePartition::Ladybird { sequence, .. }, ImageRole::Sequence) => Some(sequence.as_str()),
            (ImagePartition::Ladybird { result, .. }, ImageRole::Result) => Some(result.as_str()),
            (ImagePartition::MapPanner { found, .. }, ImageRole::Found) => found.as_deref(),
            (ImagePartition::MapPanner { pan_operations, .. }, ImageRole::PanOperation(i)) => {
                pan_operations.get(i).map(String::as_str)
            }
            _ => None,
        }
    }

    /// 按展示顺序列出所有缩略图
    pub fn slots(&self) -> Vec<ImageSlot<'_>> {
        let mut slots = Vec::new();

        match self {
            ImagePartition::FrogCrossing {
                initial,
                started,
                final_image,
                movements,
            } => {
                push_slot(&mut slots, ImageRole::Initial, "Initial".to_string(), initial.as_deref());
                push_slot(&mut slots, ImageRole::Started, "Started".to_string(), started.as_deref());
                push_slot(&mut slots, ImageRole::Final, "Final".to_string(), final_image.as_deref());
                for (i, path) in movements.iter().enumerate() {
                    push_slot(&mut slots, ImageRole::Movement(i), format!("Move {}", move_number(path)), Some(path.as_str()));
                }
            }
            ImagePartition::Ladybird {
                initial,
                sequence,
                result,
            } => {
                push_slot(&mut slots, ImageRole::Initial, "initial".to_string(), Some(initial.as_str()));
                push_slot(&mut slots, ImageRole::Sequence, "sequence".to_string(), Some(sequence.as_str()));
                push_slot(&mut slots, ImageRole::Result, "result".to_string(), Some(result.as_str()));
            }
            ImagePartition::MapPanner {
                initial,
                found,
                pan_operations,
            } => {
                push_slot(&mut slots, ImageRole::Initial, "Initial View".to_string(), initial.as_deref());
                push_slot(&mut slots, ImageRole::Found, "Target Found".to_string(), found.as_deref());
                for (i, path) in pan_operations.iter().enumerate() {
                    push_slot(
                        &mut slots,
                        ImageRole::PanOperation(i),
                        format!("Pan Step {}: {}", i + 1, pan_step_description(path)),
                        Some(path.as_str()),
                    );
                }
            }
        }

        slots
    }
}

fn push_slot<'a>(slots: &mut Vec<ImageSlot<'a>>, role: ImageRole, label: String, path: Option<&'a str>) {
    if let Some(path) = path {
        slots.push(ImageSlot { role, label, path });
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// 移动编号：文件名按 `_` 切分后的倒数第二段
fn move_number(path: &str) -> &str {
    let parts: Vec<&str> = path.split('_').collect();
    if parts.len() >= 2 {
        parts[parts.len() - 2]
    } else {
        file_name(path)
    }
}

/// 平移步骤说明：最后两段，去掉 .png
fn pan_step_description(path: &str) -> String {
    let parts: Vec<&str> = path.split('_').collect();
    let start = parts.len().saturating_sub(2);
    parts[start..].join(" ").replace(".png", "")
}
