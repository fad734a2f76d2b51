//! 文本展示服务
//!
//! 把当前会话渲染成纯文本，供终端查看器输出。

use crate::error::{AppError, AppResult};
use crate::models::{EpisodeRecord, Position, TaskKind};
use crate::services::image_categorizer::ImagePartition;
use crate::workflow::ViewerSession;
use std::fmt::Write;

/// 渲染当前记录
///
/// 图片无法分类时返回错误，调用方可改用 [`render_degraded`]。
pub fn render(session: &ViewerSession) -> AppResult<String> {
    let partition = session.partition()?;
    let mut out = String::new();

    render_header(&mut out, session);
    render_thumbnails(&mut out, session, &partition);
    render_selection(&mut out, session);
    render_task_fields(&mut out, session);
    render_json(&mut out, session)?;

    Ok(out)
}

/// 分类失败时的降级输出：保留头部、选中图片和任务字段，缩略图处给出错误
pub fn render_degraded(session: &ViewerSession, error: &AppError) -> String {
    let mut out = String::new();

    render_header(&mut out, session);
    let _ = writeln!(out, "\n### Thumbnails");
    let _ = writeln!(out, "  (unavailable: {})", error);
    render_selection(&mut out, session);
    render_task_fields(&mut out, session);

    out
}

fn render_header(out: &mut String, session: &ViewerSession) {
    let record = session.current();
    let navigator = session.navigator();

    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "{} Dataset Visualizer", session.kind().title());
    let _ = writeln!(
        out,
        "Line {} of {} (Task Index: {})",
        navigator.current_index() + 1,
        navigator.len(),
        record.task_index_text()
    );

    let mut hints = Vec::new();
    if navigator.has_previous() {
        hints.push("[p] Previous");
    }
    if navigator.has_next() {
        hints.push("[n] Next");
    }
    if !hints.is_empty() {
        let _ = writeln!(out, "{}", hints.join("  "));
    }
    let _ = writeln!(out, "{}", "=".repeat(60));
}

fn render_thumbnails(out: &mut String, session: &ViewerSession, partition: &ImagePartition) {
    let dataset = session.dataset();

    let _ = writeln!(out, "\n### Thumbnails");
    for slot in partition.slots() {
        let _ = writeln!(
            out,
            "  [{}] {} -> {}",
            slot.role,
            slot.label,
            dataset.resolve_image(slot.path).display()
        );
    }
}

fn render_selection(out: &mut String, session: &ViewerSession) {
    let _ = writeln!(out, "\n### Selected Image");
    match session.selection() {
        Some(selection) => {
            let _ = writeln!(out, "  {} ({})", selection.path.display(), selection.role);
        }
        None => {
            let _ = writeln!(out, "  (none)");
        }
    }
}

fn render_task_fields(out: &mut String, session: &ViewerSession) {
    let record = session.current();
    match session.kind() {
        TaskKind::FrogCrossing => render_frog_crossing(out, record),
        TaskKind::Ladybird => render_ladybird(out, record),
        TaskKind::MapPanner => render_map_panner(out, record),
    }
}

fn render_json(out: &mut String, session: &ViewerSession) -> AppResult<()> {
    if session.show_json {
        let _ = writeln!(out, "\n### Full JSON Data");
        let json = serde_json::to_string_pretty(&session.current().raw)
            .map_err(|e| AppError::format("完整 JSON", e.to_string()))?;
        let _ = writeln!(out, "{}", json);
    }
    Ok(())
}

fn render_frog_crossing(out: &mut String, record: &EpisodeRecord) {
    let _ = writeln!(out, "\n### Frog Positions");
    let _ = writeln!(out, "Initial Position: {}", position_text(record.initial_frog_pos));
    let _ = writeln!(out, "Final Position: {}", position_text(record.final_frog_pos));

    render_password(out, record);
    if let Some(seed) = &record.seed {
        let _ = writeln!(out, "### Seed: {}", seed);
    }

    let _ = writeln!(out, "\n### Actions ({})", record.actions.len());
    let _ = writeln!(out, "{:>4}  {:<16} Key", "#", "Action");
    for (i, action) in record.actions.iter().enumerate() {
        let _ = writeln!(out, "{:>4}  {:<16} {}", i + 1, action.kind(), action.key());
    }
}

fn render_ladybird(out: &mut String, record: &EpisodeRecord) {
    let _ = writeln!(out, "\n### Data:");
    let _ = writeln!(
        out,
        "Password: {}",
        record.password.as_deref().unwrap_or("N/A")
    );
    let _ = writeln!(out, "Actions: {}", record.actions.len());
}

fn render_map_panner(out: &mut String, record: &EpisodeRecord) {
    let _ = writeln!(out, "\n### Target Position");
    let _ = writeln!(out, "{}", position_text(record.target_pos));

    render_password(out, record);

    let _ = writeln!(out, "\n### Total Actions: {}", record.actions.len());
    let _ = writeln!(out, "{:>4}  {:<16} {:>10} {:>10}", "#", "Action", "X Offset", "Y Offset");
    for (i, action) in record.actions.iter().enumerate() {
        let (x, y) = action.offsets();
        let _ = writeln!(out, "{:>4}  {:<16} {:>10} {:>10}", i + 1, action.kind(), x, y);
    }

    if let (Some(start), Some(end), Some((dx, dy))) =
        (record.start_pos, record.end_pos, record.total_movement())
    {
        let _ = writeln!(out, "\n### Map Movement");
        let _ = writeln!(out, "Start position: {}", position_text(Some(start)));
        let _ = writeln!(out, "End position: {}", position_text(Some(end)));
        let _ = writeln!(out, "Total movement: dX: {}, dY: {}", dx, dy);
    }
}

fn render_password(out: &mut String, record: &EpisodeRecord) {
    if let Some(password) = &record.password {
        let _ = writeln!(out, "### Password: {}", password);
    }
}

fn position_text(pos: Option<Position>) -> String {
    match pos {
        Some(p) => format!("X: {}, Y: {}", p.x, p.y),
        None => "N/A".to_string(),
    }
}
