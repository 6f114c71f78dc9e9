//! 题目构建器
//!
//! 逐行接收分类结果，累积当前题目的题干和选项，遇到下一道题或输入结束时收尾。
//! 每次解析都使用独立的构建器，不存在全局状态。

use rand::Rng;
use tracing::debug;

use crate::models::question::{Answer, Question};
use crate::parser::classifier::LineKind;
use crate::parser::id::stable_id;
use crate::parser::shuffle::shuffle_answers_with;

/// 正在累积的题目块
#[derive(Debug, Default)]
struct OpenQuestion {
    text: String,
    answers: Vec<String>,
    /// 被认定为正确的选项位置。块内选项只追加不删除，位置即身份。
    correct: Option<usize>,
}

/// 题目构建器
#[derive(Debug, Default)]
pub struct QuestionBuilder {
    current: Option<OpenQuestion>,
    questions: Vec<Question>,
    dropped: usize,
}

impl QuestionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 处理一行分类结果
    pub fn push<R: Rng + ?Sized>(&mut self, line: LineKind<'_>, rng: &mut R) {
        match line {
            LineKind::QuestionStart(rest) => {
                self.finalize(rng);
                self.current = Some(OpenQuestion {
                    text: rest.to_string(),
                    ..Default::default()
                });
            }
            LineKind::AnswerStart(rest) => {
                // 第一道题之前的选项没有归属，直接忽略
                let Some(open) = self.current.as_mut() else {
                    debug!("忽略题目之前的选项: {}", rest);
                    return;
                };
                if open.answers.is_empty() {
                    open.correct = Some(0);
                }
                open.answers.push(rest.to_string());
            }
            LineKind::Continuation(rest) => {
                let Some(open) = self.current.as_mut() else {
                    debug!("忽略题目之前的文本: {}", rest);
                    return;
                };
                match open.answers.last_mut() {
                    Some(answer) => append_text(answer, rest),
                    None => append_text(&mut open.text, rest),
                }
            }
        }
    }

    /// 收尾最后一道题并返回全部题目（保持文档顺序）
    pub fn finish<R: Rng + ?Sized>(mut self, rng: &mut R) -> Vec<Question> {
        self.finalize(rng);
        if self.dropped > 0 {
            debug!("丢弃了 {} 个不完整的题目块", self.dropped);
        }
        self.questions
    }

    fn finalize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let Some(open) = self.current.take() else {
            return;
        };

        match build_question(open, rng) {
            Some(question) => self.questions.push(question),
            None => self.dropped += 1,
        }
    }
}

/// 把一个题目块转换为题目；题干为空、没有选项或正确选项为空时返回 `None`
fn build_question<R: Rng + ?Sized>(open: OpenQuestion, rng: &mut R) -> Option<Question> {
    let text = open.text.trim().to_string();
    let correct = open.correct?;
    if text.is_empty() || open.answers.is_empty() || open.answers[correct].is_empty() {
        return None;
    }

    let answers: Vec<Answer> = open
        .answers
        .into_iter()
        .enumerate()
        .filter(|(_, answer_text)| !answer_text.is_empty())
        .map(|(idx, answer_text)| Answer::new(answer_text, idx == correct))
        .collect();

    let shuffled_answers = shuffle_answers_with(&answers, rng);
    let correct_index = shuffled_answers.iter().position(|a| a.is_correct)?;

    Some(Question {
        id: stable_id(&text),
        text,
        answers,
        shuffled_answers,
        correct_index,
    })
}

fn append_text(target: &mut String, extra: &str) {
    let joined = format!("{} {}", target, extra);
    *target = joined.trim().to_string();
}
