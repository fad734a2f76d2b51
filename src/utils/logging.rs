/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use crate::clients::forms_client::form_edit_url;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// `RUST_LOG` 优先；否则 verbose 时为 debug，默认 info。
/// 日志写到 stderr，避免与查看器输出混在一起。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `mode`: 运行模式（view / form）
pub fn log_startup(mode: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {} 模式", mode);
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// 记录数据集加载信息
pub fn log_dataset_loaded(path: &str, total: usize) {
    info!("✓ 已加载数据集: {}", path);
    info!("📋 共 {} 条记录", total);
}

/// 记录表单创建结果
///
/// # 参数
/// - `form_id`: Forms API 返回的表单ID
/// - `question_count`: 挑战题目数量（不含身份题）
pub fn log_form_created(form_id: &str, question_count: usize) {
    info!("\n{}", "=".repeat(60));
    info!("✅ 表单创建成功! Form ID: {}", form_id);
    info!("📝 挑战题目数: {}", question_count);
    info!("查看地址: {}", form_edit_url(form_id));
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("abc", 5), "abc");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        // 按字符而不是字节截断
        assert_eq!(truncate_text("青蛙过河", 2), "青蛙...");
    }
}
