use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 二维坐标（位置字段统一为 {x, y}）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 单个动作
///
/// 至少包含 `action` 字段，其余字段按动作类型不同而不同
/// （按键动作有 `key`，平移动作有 `x_offset` / `y_offset`）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(pub Map<String, Value>);

impl Action {
    /// 动作类型，无法识别时为 "unknown"
    pub fn kind(&self) -> &str {
        self.0
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    }

    /// 取字段的展示文本，缺失时为 "N/A"
    pub fn field_text(&self, name: &str) -> String {
        match self.0.get(name) {
            None | Some(Value::Null) => "N/A".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn key(&self) -> String {
        self.field_text("key")
    }

    /// 平移偏移量 (x_offset, y_offset)
    pub fn offsets(&self) -> (String, String) {
        (self.field_text("x_offset"), self.field_text("y_offset"))
    }
}

/// 一条回合记录（数据集中的一行）
///
/// 加载后不可变；原始 JSON 保存在 `raw` 中用于完整展示。
#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeRecord {
    #[serde(default, alias = "taskIndex")]
    pub task_index: Option<i64>,

    /// 相对数据集文件所在目录的图片路径，第一张为初始状态
    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub actions: Vec<Action>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default, deserialize_with = "deserialize_seed")]
    pub seed: Option<String>,

    // --- 青蛙过河 ---
    #[serde(default, rename = "initialFrogPos")]
    pub initial_frog_pos: Option<Position>,
    #[serde(default, rename = "finalFrogPos")]
    pub final_frog_pos: Option<Position>,

    // --- 地图平移 ---
    #[serde(default, rename = "targetPos")]
    pub target_pos: Option<Position>,
    #[serde(default, rename = "startPos")]
    pub start_pos: Option<Position>,
    #[serde(default, rename = "endPos")]
    pub end_pos: Option<Position>,

    #[serde(skip)]
    pub raw: Value,
}

impl EpisodeRecord {
    /// 从一行已解析的 JSON 构造记录
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let mut record = EpisodeRecord::deserialize(&value)?;
        record.raw = value;
        Ok(record)
    }

    /// 任务索引的展示文本
    pub fn task_index_text(&self) -> String {
        self.task_index
            .map(|i| i.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// 起止位置之间的总位移 (dx, dy)，两者都存在时才有
    pub fn total_movement(&self) -> Option<(f64, f64)> {
        match (self.start_pos, self.end_pos) {
            (Some(start), Some(end)) => Some((end.x - start.x, end.y - start.y)),
            _ => None,
        }
    }
}

// seed 可能是字符串也可能是数字，统一成字符串
fn deserialize_seed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct SeedVisitor;

    impl<'de> Visitor<'de> for SeedVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or number seed")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            deserializer.deserialize_any(SeedVisitor)
        }
    }

    deserializer.deserialize_any(SeedVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_from_value() {
        let value = json!({
            "taskIndex": 7,
            "images": ["a.png", "b.png"],
            "actions": [{"action": "keypress", "key": "ArrowUp"}, {"key": "ArrowLeft"}],
            "password": "FROG_MASTER",
            "seed": 12345,
            "initialFrogPos": {"x": 3, "y": 9},
            "finalFrogPos": {"x": 3.5, "y": 0},
            "extra": true
        });

        let record = EpisodeRecord::from_value(value.clone()).unwrap();
        assert_eq!(record.task_index, Some(7));
        assert_eq!(record.images, vec!["a.png", "b.png"]);
        assert_eq!(record.seed.as_deref(), Some("12345"));
        assert_eq!(record.initial_frog_pos, Some(Position { x: 3.0, y: 9.0 }));
        assert_eq!(record.actions[0].kind(), "keypress");
        assert_eq!(record.actions[0].key(), "ArrowUp");
        // 缺少 action 字段时显示 unknown
        assert_eq!(record.actions[1].kind(), "unknown");
        assert_eq!(record.raw, value);
    }

    #[test]
    fn test_optional_fields_default() {
        let record = EpisodeRecord::from_value(json!({"images": ["x.png"]})).unwrap();
        assert_eq!(record.task_index_text(), "N/A");
        assert!(record.actions.is_empty());
        assert!(record.password.is_none());
        assert!(record.seed.is_none());
        assert!(record.total_movement().is_none());
    }

    #[test]
    fn test_string_seed_and_snake_case_index() {
        let record =
            EpisodeRecord::from_value(json!({"task_index": 2, "seed": "abc", "images": []})).unwrap();
        assert_eq!(record.task_index, Some(2));
        assert_eq!(record.seed.as_deref(), Some("abc"));
    }

    #[test]
    fn test_pan_offsets_and_movement() {
        let record = EpisodeRecord::from_value(json!({
            "images": ["m.png"],
            "actions": [{"action": "pan", "x_offset": -40, "y_offset": 15}, {"action": 3}],
            "startPos": {"x": 100, "y": 200},
            "endPos": {"x": 160, "y": 150}
        }))
        .unwrap();

        assert_eq!(record.actions[0].offsets(), ("-40".to_string(), "15".to_string()));
        assert_eq!(record.actions[1].kind(), "unknown");
        assert_eq!(record.actions[1].offsets().0, "N/A");
        assert_eq!(record.total_movement(), Some((60.0, -50.0)));
    }

    #[test]
    fn test_non_object_action_is_rejected() {
        assert!(EpisodeRecord::from_value(json!({"images": [], "actions": ["up"]})).is_err());
    }
}
