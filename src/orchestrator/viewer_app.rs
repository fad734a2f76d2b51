//! 数据集查看器 - 编排层
//!
//! 终端版本的查看器：每次操作后重新输出当前记录。
//! 加载失败直接终止，不展示任何部分数据；命令输入错误只提示，不退出。

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{load_dataset, TaskKind};
use crate::services::image_categorizer::ImageRole;
use crate::services::presenter;
use crate::utils::logging::log_dataset_loaded;
use crate::workflow::ViewerSession;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const HELP: &str = "\
命令:
  n                下一条
  p                上一条
  j <行号>         跳转到第几条（从1开始）
  s <角色> [序号]  选中图片，如 s final / s move 2 / s pan 1（序号从1开始）
  json             显示/隐藏完整 JSON
  h                帮助
  q                退出";

static COMMAND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_]+)(?:\s+([A-Za-z_]+|\d+))?(?:\s+(\d+))?$").expect("命令正则是常量")
});

/// 查看器命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    Next,
    Previous,
    /// 行号，从1开始
    Jump(usize),
    Select(ImageRole),
    ToggleJson,
    Help,
    Quit,
}

impl ViewerCommand {
    /// 解析一行输入
    pub fn parse(line: &str) -> AppResult<Self> {
        let line = line.trim();
        let invalid = || AppError::format("命令", format!("无法识别: '{}'，输入 h 查看帮助", line));

        let caps = COMMAND_RE.captures(line).ok_or_else(invalid)?;
        let name = caps.get(1).map(|m| m.as_str().to_lowercase()).unwrap_or_default();
        let arg = caps.get(2).map(|m| m.as_str());
        let index = caps.get(3).map(|m| m.as_str());

        let command = match (name.as_str(), arg, index) {
            ("n" | "next", None, None) => ViewerCommand::Next,
            ("p" | "prev" | "previous", None, None) => ViewerCommand::Previous,
            ("j" | "jump", Some(n), None) => {
                ViewerCommand::Jump(n.parse().map_err(|_| invalid())?)
            }
            ("s" | "select", Some(role), index) => {
                // 组内序号对外从1开始，0 无效
                let index = match index {
                    Some(i) => match i.parse::<usize>() {
                        Ok(n) if n >= 1 => Some(n - 1),
                        _ => return Err(invalid()),
                    },
                    None => None,
                };
                ViewerCommand::Select(ImageRole::parse(role, index).ok_or_else(invalid)?)
            }
            ("json", None, None) => ViewerCommand::ToggleJson,
            ("h" | "help", None, None) => ViewerCommand::Help,
            ("q" | "quit" | "exit", None, None) => ViewerCommand::Quit,
            _ => return Err(invalid()),
        };
        Ok(command)
    }
}

/// 查看器主结构
pub struct ViewerApp {
    session: ViewerSession,
}

impl ViewerApp {
    /// 加载数据集并初始化会话
    ///
    /// 未指定任务类型时从路径推断。
    pub fn initialize(config: &Config, path: Option<PathBuf>, kind: Option<TaskKind>) -> Result<Self> {
        let path = path.unwrap_or_else(|| PathBuf::from(&config.default_dataset_path));

        let kind = match kind.or_else(|| TaskKind::from_dataset_path(&path)) {
            Some(kind) => kind,
            None => anyhow::bail!(
                "无法从路径 {} 推断任务类型，请用 --task 指定 (frog-crossing / ladybird / map-panner)",
                path.display()
            ),
        };

        Ok(Self {
            session: Self::open(&path, kind)?,
        })
    }

    fn open(path: &Path, kind: TaskKind) -> Result<ViewerSession> {
        info!("\n📁 正在加载数据集 ({})...", kind);
        let dataset = load_dataset(path)
            .with_context(|| format!("无法加载数据集: {}", path.display()))?;
        log_dataset_loaded(&path.display().to_string(), dataset.len());

        Ok(ViewerSession::new(kind, dataset)?)
    }

    pub fn session(&self) -> &ViewerSession {
        &self.session
    }

    /// 执行一条命令，返回是否继续
    pub fn apply(&mut self, command: ViewerCommand) -> AppResult<bool> {
        match command {
            ViewerCommand::Next => {
                self.session.next();
            }
            ViewerCommand::Previous => {
                self.session.previous();
            }
            ViewerCommand::Jump(line) => {
                let len = self.session.navigator().len();
                if line == 0 || line > len {
                    warn!("行号 {} 超出范围 [1, {}]，已调整到边界", line, len);
                }
                self.session.jump(line);
            }
            ViewerCommand::Select(role) => {
                self.session.select(role)?;
            }
            ViewerCommand::ToggleJson => {
                self.session.show_json = !self.session.show_json;
            }
            ViewerCommand::Help => {}
            ViewerCommand::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// 交互主循环
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        self.show(&mut output)?;
        writeln!(output, "{}", HELP)?;

        for line in input.lines() {
            let line = line.context("读取输入失败")?;
            if line.trim().is_empty() {
                continue;
            }

            let command = match ViewerCommand::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    warn!("{}", e);
                    continue;
                }
            };

            match self.apply(command) {
                Ok(false) => break,
                Ok(true) if command == ViewerCommand::Help => writeln!(output, "{}", HELP)?,
                Ok(true) => self.show(&mut output)?,
                Err(e) => warn!("{}", e),
            }
        }

        info!("👋 查看器已退出");
        Ok(())
    }

    /// 输出当前记录；图片无法分类时输出降级视图，查看器继续运行
    fn show<W: Write>(&self, output: &mut W) -> Result<()> {
        let text = match presenter::render(&self.session) {
            Ok(text) => text,
            Err(e) => {
                warn!("第 {} 条记录无法完整显示: {}", self.session.navigator().current_index() + 1, e);
                presenter::render_degraded(&self.session, &e)
            }
        };
        writeln!(output, "{}", text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ViewerCommand::parse("n").unwrap(), ViewerCommand::Next);
        assert_eq!(ViewerCommand::parse(" prev ").unwrap(), ViewerCommand::Previous);
        assert_eq!(ViewerCommand::parse("j 12").unwrap(), ViewerCommand::Jump(12));
        assert_eq!(
            ViewerCommand::parse("s final").unwrap(),
            ViewerCommand::Select(ImageRole::Final)
        );
        assert_eq!(
            ViewerCommand::parse("s move 2").unwrap(),
            ViewerCommand::Select(ImageRole::Movement(1))
        );
        assert_eq!(ViewerCommand::parse("json").unwrap(), ViewerCommand::ToggleJson);
        assert_eq!(ViewerCommand::parse("q").unwrap(), ViewerCommand::Quit);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ViewerCommand::parse("j").is_err());
        assert!(ViewerCommand::parse("j abc").is_err());
        assert!(ViewerCommand::parse("s move").is_err());
        assert!(ViewerCommand::parse("s move 0").is_err());
        assert!(ViewerCommand::parse("s pan 0").is_err());
        assert!(ViewerCommand::parse("fly away now").is_err());
    }
}
