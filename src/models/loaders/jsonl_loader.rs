//! JSON-Lines 加载器
//!
//! 每个非空行是一个独立的 JSON 值。任意一行失败则整体失败，不返回部分结果。

use crate::error::{AppError, AppResult};
use crate::models::{Challenge, EpisodeRecord};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 数据集文件扩展名
pub const DATASET_EXTENSION: &str = "jsonl";

/// 已加载的数据集
#[derive(Debug, Clone)]
pub struct Dataset {
    /// 数据集文件路径
    pub path: PathBuf,
    /// 图片相对路径的解析基准（数据集文件所在目录）
    pub base_dir: PathBuf,
    pub records: Vec<EpisodeRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EpisodeRecord> {
        self.records.get(index)
    }

    /// 把记录中的相对图片路径解析到数据集目录下
    ///
    /// 路径按 POSIX 风格存储，逐段拼接，与进程工作目录无关。
    pub fn resolve_image(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.base_dir.clone(), |acc, part| acc.join(part))
    }
}

/// 读取 JSON-Lines 文件，返回按行序排列的 JSON 值
pub fn load_jsonl(path: &Path) -> AppResult<Vec<Value>> {
    Ok(read_numbered_lines(path)?
        .into_iter()
        .map(|(_, value)| value)
        .collect())
}

/// 读取 JSON-Lines 文件并反序列化为指定类型
///
/// 某一行 JSON 合法但结构不符时返回 `Format` 错误。
pub fn load_jsonl_as<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    read_numbered_lines(path)?
        .into_iter()
        .map(|(line, value)| {
            serde_json::from_value(value).map_err(|e| {
                AppError::format(format!("{} 第 {} 行", path.display(), line), e.to_string())
            })
        })
        .collect()
}

/// 加载回合数据集
///
/// # 错误
/// - 文件不存在: `NotFound`
/// - 扩展名不是 `.jsonl`: `Format`
/// - 某行不是合法 JSON: `Parse`
/// - 某行结构不符合回合记录: `Format`
pub fn load_dataset(path: &Path) -> AppResult<Dataset> {
    if !path.exists() {
        return Err(AppError::not_found(path.display().to_string()));
    }

    if path.extension().and_then(|s| s.to_str()) != Some(DATASET_EXTENSION) {
        return Err(AppError::format(
            path.display().to_string(),
            "文件不是 .jsonl 文件",
        ));
    }

    let records = read_numbered_lines(path)?
        .into_iter()
        .map(|(line, value)| {
            EpisodeRecord::from_value(value).map_err(|e| {
                AppError::format(format!("{} 第 {} 行", path.display(), line), e.to_string())
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    debug!("数据集 {} 解析完成: {} 条记录", path.display(), records.len());

    Ok(Dataset {
        path: path.to_path_buf(),
        base_dir,
        records,
    })
}

/// 加载挑战列表
pub fn load_challenges(path: &Path) -> AppResult<Vec<Challenge>> {
    load_jsonl_as(path)
}

/// 逐行解析，返回 (1 起始的行号, JSON 值)，跳过空行
fn read_numbered_lines(path: &Path) -> AppResult<Vec<(usize, Value)>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::not_found(path.display().to_string())
        } else {
            AppError::io(path.display().to_string(), e)
        }
    })?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line)
                .map(|value| (idx + 1, value))
                .map_err(|source| AppError::Parse {
                    path: path.display().to_string(),
                    line: idx + 1,
                    source,
                })
        })
        .collect()
}
