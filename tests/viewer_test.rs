use serde_json::json;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use webgames_tools::config::Config;
use webgames_tools::models::{load_dataset, TaskKind};
use webgames_tools::orchestrator::{ViewerApp, ViewerCommand};
use webgames_tools::services::presenter;
use webgames_tools::{AppError, ImageRole, ViewerSession};

/// 写一个数据集文件，每个值占一行
fn write_dataset(dir: &Path, name: &str, records: &[serde_json::Value]) -> PathBuf {
    let content: Vec<String> = records.iter().map(|r| r.to_string()).collect();
    let path = dir.join(name);
    fs::write(&path, content.join("\n") + "\n").unwrap();
    path
}

fn frog_record(task_index: i64, moves: usize) -> serde_json::Value {
    let mut images = vec![
        format!("images/{}/frog_0_initial.png", task_index),
        format!("images/{}/frog_1_started.png", task_index),
    ];
    for i in 0..moves {
        images.push(format!("images/{}/frog_{}_move.png", task_index, i + 2));
    }
    images.push(format!("images/{}/frog_{}_final.png", task_index, moves + 2));

    json!({
        "taskIndex": task_index,
        "images": images,
        "actions": [{"action": "keypress", "key": "ArrowUp"}, {"key": "ArrowDown"}],
        "password": "FROG_CROSSER",
        "seed": task_index * 100,
        "initialFrogPos": {"x": 4, "y": 9},
        "finalFrogPos": {"x": 4, "y": 0}
    })
}

#[test]
fn test_loader_keeps_line_order() {
    let dir = tempfile::tempdir().unwrap();
    let records: Vec<_> = (0..7).map(|i| frog_record(i, 1)).collect();
    let path = write_dataset(dir.path(), "dataset.jsonl", &records);

    let dataset = load_dataset(&path).unwrap();
    assert_eq!(dataset.len(), 7);
    let indices: Vec<_> = dataset.records.iter().map(|r| r.task_index).collect();
    assert_eq!(indices, (0..7).map(Some).collect::<Vec<_>>());
}

#[test]
fn test_loader_is_all_or_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dataset.jsonl");
    fs::write(&path, format!("{}\nnot json\n{}\n", frog_record(0, 0), frog_record(1, 0))).unwrap();

    match load_dataset(&path) {
        Err(AppError::Parse { line, .. }) => assert_eq!(line, 2),
        other => panic!("期望 Parse 错误，实际: {:?}", other.map(|d| d.len())),
    }
}

#[test]
fn test_session_navigation_resets_selection() {
    let dir = tempfile::tempdir().unwrap();
    let records: Vec<_> = (0..3).map(|i| frog_record(i, 2)).collect();
    let path = write_dataset(dir.path(), "dataset.jsonl", &records);

    let mut session = ViewerSession::new(TaskKind::FrogCrossing, load_dataset(&path).unwrap()).unwrap();
    assert_eq!(
        session.selection().unwrap().path,
        dir.path().join("images").join("0").join("frog_0_initial.png")
    );

    session.select(ImageRole::Final).unwrap();
    assert_eq!(session.selection().unwrap().role, ImageRole::Final);

    session.next();
    let selection = session.selection().unwrap();
    assert_eq!(selection.role, ImageRole::Initial);
    assert_eq!(selection.path, dir.path().join("images").join("1").join("frog_0_initial.png"));

    for _ in 0..10 {
        session.next();
    }
    assert_eq!(session.navigator().current_index(), 2);

    for _ in 0..10 {
        session.previous();
    }
    assert_eq!(session.navigator().current_index(), 0);

    // 跳转越界时限制到边界
    assert_eq!(session.jump(99), 2);
    assert_eq!(session.jump(0), 0);
}

#[test]
fn test_select_missing_image_fails_without_changing_selection() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(dir.path(), "dataset.jsonl", &[frog_record(0, 0)]);

    let mut session = ViewerSession::new(TaskKind::FrogCrossing, load_dataset(&path).unwrap()).unwrap();
    assert!(session.select(ImageRole::Movement(0)).is_err());
    assert_eq!(session.selection().unwrap().role, ImageRole::Initial);
}

#[test]
fn test_empty_dataset_cannot_be_viewed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dataset.jsonl");
    fs::write(&path, "\n").unwrap();

    let dataset = load_dataset(&path).unwrap();
    assert!(dataset.is_empty());
    assert!(matches!(
        ViewerSession::new(TaskKind::Ladybird, dataset),
        Err(AppError::Format { .. })
    ));
}

#[test]
fn test_ladybird_short_record_still_navigable() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(
        dir.path(),
        "dataset.jsonl",
        &[
            json!({"images": ["a.png", "b.png"], "actions": [], "password": "BUG"}),
            json!({"images": ["c.png", "d.png", "e.png"], "actions": [{"action": "click"}], "password": "BUG2"}),
        ],
    );

    let mut session = ViewerSession::new(TaskKind::Ladybird, load_dataset(&path).unwrap()).unwrap();
    // 不足三张时分类失败，但初始图片仍然可以显示
    assert!(session.partition().is_err());
    let err = presenter::render(&session).unwrap_err();
    let degraded = presenter::render_degraded(&session, &err);
    assert!(degraded.contains("Line 1 of 2"));
    assert!(degraded.contains("Password: BUG"));
    assert_eq!(session.selection().unwrap().path, dir.path().join("a.png"));

    session.next();
    let text = presenter::render(&session).unwrap();
    assert!(text.contains("Password: BUG2"));
    assert!(text.contains("Actions: 1"));
}

#[test]
fn test_viewer_app_keeps_running_across_short_ladybird_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(
        dir.path(),
        "dataset.jsonl",
        &[
            json!({"images": ["a.png", "b.png", "c.png"], "actions": [], "password": "FIRST"}),
            json!({"images": ["d.png"], "actions": [{"action": "click"}], "password": "MID"}),
            json!({"images": ["e.png", "f.png", "g.png"], "actions": [], "password": "LAST"}),
        ],
    );

    let mut app = ViewerApp::initialize(&Config::default(), Some(path), Some(TaskKind::Ladybird)).unwrap();
    let mut output = Vec::new();
    app.run(Cursor::new("n\ns sequence\nn\nq\n"), &mut output).unwrap();

    // 第二条只有一张图，但之后的命令照常执行
    assert_eq!(app.session().navigator().current_index(), 2);

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Line 1 of 3"));
    assert!(text.contains("[n] Next"));
    assert!(text.contains("Line 2 of 3"));
    assert!(text.contains("(unavailable:"));
    assert!(text.contains("Password: MID"));
    assert!(text.contains(&dir.path().join("d.png").display().to_string()));
    assert!(text.contains("Line 3 of 3"));
    assert!(text.contains("Password: LAST"));
}

#[test]
fn test_viewer_app_starts_on_short_ladybird_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(
        dir.path(),
        "dataset.jsonl",
        &[
            json!({"images": ["a.png", "b.png"], "actions": [], "password": "SHORT"}),
            json!({"images": ["c.png", "d.png", "e.png"], "actions": [], "password": "FULL"}),
        ],
    );

    let mut app = ViewerApp::initialize(&Config::default(), Some(path), Some(TaskKind::Ladybird)).unwrap();
    let mut output = Vec::new();
    app.run(Cursor::new("n\nq\n"), &mut output).unwrap();

    assert_eq!(app.session().navigator().current_index(), 1);
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Password: SHORT"));
    assert!(text.contains("Password: FULL"));
    assert!(text.contains("[p] Previous"));
}

#[test]
fn test_render_frog_crossing() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(dir.path(), "dataset.jsonl", &[frog_record(5, 2)]);

    let mut session = ViewerSession::new(TaskKind::FrogCrossing, load_dataset(&path).unwrap()).unwrap();
    let text = presenter::render(&session).unwrap();

    assert!(text.contains("Line 1 of 1 (Task Index: 5)"));
    assert!(text.contains("Initial Position: X: 4, Y: 9"));
    assert!(text.contains("### Password: FROG_CROSSER"));
    assert!(text.contains("### Seed: 500"));
    assert!(text.contains("Move 2"));
    assert!(text.contains("Move 3"));
    assert!(text.contains("unknown"));
    assert!(!text.contains("Full JSON Data"));

    session.show_json = true;
    let text = presenter::render(&session).unwrap();
    assert!(text.contains("Full JSON Data"));
    assert!(text.contains("\"initialFrogPos\""));
}

#[test]
fn test_render_map_panner() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(
        dir.path(),
        "dataset.jsonl",
        &[json!({
            "images": ["m/start.png", "m/ep_pan_1.png", "m/ep_zoom_1.png", "m/ep_pan_2.png", "m/found.png"],
            "actions": [
                {"action": "pan", "x_offset": 120, "y_offset": -30},
                {"action": "pan", "x_offset": -20}
            ],
            "targetPos": {"x": 1500, "y": 400},
            "startPos": {"x": 0, "y": 0},
            "endPos": {"x": 100, "y": -30},
            "password": "TREASURE"
        })],
    );

    let session = ViewerSession::new(TaskKind::MapPanner, load_dataset(&path).unwrap()).unwrap();
    let partition = session.partition().unwrap();
    assert_eq!(partition.get(ImageRole::PanOperation(1)), Some("m/ep_pan_2.png"));
    assert_eq!(partition.get(ImageRole::PanOperation(2)), None);

    let text = presenter::render(&session).unwrap();
    assert!(text.contains("X: 1500, Y: 400"));
    assert!(text.contains("Total Actions: 2"));
    assert!(text.contains("Total movement: dX: 100, dY: -30"));
    assert!(text.contains("Pan Step 2: pan 2"));
    assert!(!text.contains("zoom"));
}

#[test]
fn test_viewer_app_drives_session_from_input() {
    let dir = tempfile::tempdir().unwrap();
    let dataset_dir = dir.path().join("frog-crossing_20250602T182716");
    fs::create_dir(&dataset_dir).unwrap();
    let records: Vec<_> = (0..4).map(|i| frog_record(i, 1)).collect();
    let path = write_dataset(&dataset_dir, "dataset.jsonl", &records);

    // 任务类型从目录名推断
    let mut app = ViewerApp::initialize(&Config::default(), Some(path), None).unwrap();
    assert_eq!(app.session().kind(), TaskKind::FrogCrossing);

    let input = Cursor::new("n\nbogus\nj 4\ns final\np\nq\nn\n");
    let mut output = Vec::new();
    app.run(input, &mut output).unwrap();

    // q 之后的命令不再执行
    assert_eq!(app.session().navigator().current_index(), 2);
    assert_eq!(app.session().selection().unwrap().role, ImageRole::Initial);

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Line 4 of 4"));
}

#[test]
fn test_viewer_app_apply_quit() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(dir.path(), "dataset.jsonl", &[frog_record(0, 0)]);

    let mut app = ViewerApp::initialize(&Config::default(), Some(path), Some(TaskKind::FrogCrossing)).unwrap();
    assert!(app.apply(ViewerCommand::Next).unwrap());
    assert!(!app.apply(ViewerCommand::Quit).unwrap());
}

#[test]
fn test_viewer_app_requires_known_task() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(dir.path(), "dataset.jsonl", &[frog_record(0, 0)]);

    assert!(ViewerApp::initialize(&Config::default(), Some(path), None).is_err());
}
