//! 行分类
//!
//! 每一行非空文本按优先级归为三类之一：题目开始、选项开始、续行。

use once_cell::sync::Lazy;
use regex::Regex;

/// 题目标记：`<question>` 或 `12.` / `12)`
static QUESTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(?:<question>|\d+[.)]+)\s*(.*)$").unwrap());

/// 选项标记：`<variant>` 或单个字母 a-e / а-д 加 `.` / `)`
static ANSWER_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(?:<variant>|[a-eа-д][.)]+)\s*(.*)$").unwrap());

/// 行类型，携带去掉标记后的文本
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// 新题目开始，剩余文本为题干开头（可能为空）
    QuestionStart(&'a str),
    /// 新选项开始，剩余文本为选项开头（可能为空）
    AnswerStart(&'a str),
    /// 续行，属于当前打开的选项或题干
    Continuation(&'a str),
}

/// 对一行文本分类，空行返回 `None`
pub fn classify(line: &str) -> Option<LineKind<'_>> {
    if line.trim().is_empty() {
        return None;
    }

    if let Some(rest) = marker_remainder(&QUESTION_MARKER, line) {
        return Some(LineKind::QuestionStart(rest));
    }
    if let Some(rest) = marker_remainder(&ANSWER_MARKER, line) {
        return Some(LineKind::AnswerStart(rest));
    }

    Some(LineKind::Continuation(line.trim()))
}

fn marker_remainder<'a>(marker: &Regex, line: &'a str) -> Option<&'a str> {
    marker
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}
