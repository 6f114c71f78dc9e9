use crate::models::question::Question;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 答题模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    /// 测试：随机抽取固定数量的题目
    Test,
    /// 练习：只抽取尚未答对的题目
    Preparation,
    /// 速通：全部题目，随机顺序
    Speedrun,
    /// 收藏：只做收藏过的题目
    Favorites,
}

impl QuizMode {
    /// 获取模式名称
    pub fn name(self) -> &'static str {
        match self {
            QuizMode::Test => "test",
            QuizMode::Preparation => "preparation",
            QuizMode::Speedrun => "speedrun",
            QuizMode::Favorites => "favorites",
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 题库中保存的文件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedFile {
    pub id: String,
    pub name: String,
    pub questions: Vec<Question>,
    /// 毫秒时间戳
    pub timestamp: i64,
}

impl SavedFile {
    /// 以当前时间创建题库条目
    pub fn new(name: impl Into<String>, questions: Vec<Question>) -> Self {
        let timestamp = chrono::Local::now().timestamp_millis();
        Self {
            id: timestamp.to_string(),
            name: name.into(),
            questions,
            timestamp,
        }
    }
}

/// 一轮答题的历史记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestHistory {
    pub file_name: String,
    /// 毫秒时间戳
    pub date: i64,
    pub score: usize,
    pub total: usize,
    pub mode: QuizMode,
}

impl fmt::Display for TestHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(self.date)
            .map(|d| {
                d.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            })
            .unwrap_or_else(|| "未知时间".to_string());
        write!(
            f,
            "{} | {} | {} | {}/{}",
            date, self.file_name, self.mode, self.score, self.total
        )
    }
}
