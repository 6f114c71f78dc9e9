use serde::{Deserialize, Serialize};

/// 答案选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub text: String,
    pub is_correct: bool,
}

impl Answer {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

/// 题目
///
/// `answers` 保持文档中的原始顺序，`shuffled_answers` 是展示顺序，
/// `correct_index` 指向 `shuffled_answers` 中唯一的正确答案。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub answers: Vec<Answer>,
    pub shuffled_answers: Vec<Answer>,
    pub correct_index: usize,
}

impl Question {
    /// 正确答案（展示顺序中的那一项）
    pub fn correct_answer(&self) -> Option<&Answer> {
        self.shuffled_answers.get(self.correct_index)
    }

    /// 判断展示顺序中的某个选项是否正确
    pub fn is_correct_choice(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 截断题目内容以便显示（最多80个字符）
        let preview = crate::utils::truncate_text(&self.text, 80);
        write!(f, "{} [{} | {} 个选项]", preview, self.id, self.answers.len())
    }
}
