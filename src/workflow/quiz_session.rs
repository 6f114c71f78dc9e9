//! 答题会话 - 流程层
//!
//! 核心职责：定义"一轮答题"的完整流程
//!
//! 流程顺序：
//! 1. 按模式选题 → 2. 选择答案 → 3. 检查（计分、连对）→ 4. 下一题 / 结束并生成历史记录

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};

use crate::error::SessionError;
use crate::models::library::{QuizMode, TestHistory};
use crate::models::question::Question;

/// 按模式选出本轮题目在文档中的位置
///
/// - 测试：随机抽取 `session_size` 道
/// - 速通：全部题目，随机顺序
/// - 收藏：收藏过的题目，保持文档顺序
/// - 练习：尚未答对的题目中随机抽取 `session_size` 道
pub fn select_questions<R: Rng + ?Sized>(
    mode: QuizMode,
    questions: &[Question],
    session_size: usize,
    bookmarks: &BTreeSet<String>,
    solved: &HashSet<usize>,
    rng: &mut R,
) -> Result<Vec<usize>, SessionError> {
    if questions.is_empty() {
        return Err(SessionError::NoQuestions);
    }

    let all: Vec<usize> = (0..questions.len()).collect();
    let order = match mode {
        QuizMode::Test => random_sample(all, session_size, rng),
        QuizMode::Speedrun => random_sample(all, questions.len(), rng),
        QuizMode::Favorites => {
            let favorites: Vec<usize> = all
                .into_iter()
                .filter(|&i| bookmarks.contains(&questions[i].id))
                .collect();
            if favorites.is_empty() {
                return Err(SessionError::NoFavorites);
            }
            favorites
        }
        QuizMode::Preparation => {
            let unsolved: Vec<usize> = all.into_iter().filter(|i| !solved.contains(i)).collect();
            if unsolved.is_empty() {
                return Err(SessionError::AllSolved);
            }
            random_sample(unsolved, session_size, rng)
        }
    };

    if order.is_empty() {
        return Err(SessionError::NoQuestions);
    }
    debug!("模式 {} 选出 {} 道题", mode, order.len());
    Ok(order)
}

fn random_sample<R: Rng + ?Sized>(mut indices: Vec<usize>, size: usize, rng: &mut R) -> Vec<usize> {
    indices.shuffle(rng);
    indices.truncate(size);
    indices
}

/// 检查答案的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    pub correct: bool,
    /// 正确答案在展示顺序中的位置
    pub correct_index: usize,
    /// 检查后的连对次数
    pub streak: usize,
}

/// 进入下一题的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// 还有题目
    Next,
    /// 本轮结束
    Finished(TestHistory),
}

/// 答题会话
///
/// - 持有整份文档的题目和本轮的出题顺序
/// - 只记录分数、连对和答对的题目，不负责持久化
pub struct QuizSession {
    file_name: String,
    mode: QuizMode,
    questions: Vec<Question>,
    order: Vec<usize>,
    current: usize,
    score: usize,
    streak: usize,
    best_streak: usize,
    selected: Option<usize>,
    checked: bool,
    finished: bool,
    solved: Vec<usize>,
}

impl QuizSession {
    /// 创建会话，`order` 为 `select_questions` 的结果
    pub fn new(
        file_name: impl Into<String>,
        mode: QuizMode,
        questions: Vec<Question>,
        order: Vec<usize>,
    ) -> Result<Self, SessionError> {
        if order.is_empty() || order.iter().any(|&i| i >= questions.len()) {
            return Err(SessionError::NoQuestions);
        }

        let file_name = file_name.into();
        info!("📝 开始答题: {} | 模式: {} | 共 {} 道题", file_name, mode, order.len());

        Ok(Self {
            file_name,
            mode,
            questions,
            order,
            current: 0,
            score: 0,
            streak: 0,
            best_streak: 0,
            selected: None,
            checked: false,
            finished: false,
            solved: Vec::new(),
        })
    }

    /// 当前题目
    pub fn current_question(&self) -> Option<&Question> {
        if self.finished {
            return None;
        }
        self.order.get(self.current).map(|&i| &self.questions[i])
    }

    /// 选择答案（展示顺序中的位置）
    pub fn select(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_active()?;
        if self.checked {
            return Err(SessionError::AlreadyChecked);
        }

        let total = self.current_question().map(|q| q.shuffled_answers.len()).unwrap_or(0);
        if index >= total {
            return Err(SessionError::AnswerOutOfRange {
                index,
                max_index: total.saturating_sub(1),
            });
        }

        self.selected = Some(index);
        Ok(())
    }

    /// 检查已选择的答案
    pub fn check(&mut self) -> Result<CheckOutcome, SessionError> {
        self.ensure_active()?;
        if self.checked {
            return Err(SessionError::AlreadyChecked);
        }
        let selected = self.selected.ok_or(SessionError::NoAnswerSelected)?;

        let global_index = self.order[self.current];
        let question = &self.questions[global_index];
        let correct = question.is_correct_choice(selected);
        let correct_index = question.correct_index;

        if correct {
            self.score += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
            self.solved.push(global_index);
        } else {
            self.streak = 0;
        }
        self.checked = true;

        debug!(
            "第 {} 题: {} (得分 {}, 连对 {})",
            self.current + 1,
            if correct { "正确" } else { "错误" },
            self.score,
            self.streak
        );

        Ok(CheckOutcome {
            correct,
            correct_index,
            streak: self.streak,
        })
    }

    /// 进入下一题，最后一题之后结束本轮
    pub fn next(&mut self) -> Result<Step, SessionError> {
        self.ensure_active()?;
        if !self.checked {
            return Err(SessionError::NotChecked);
        }

        if self.current + 1 >= self.order.len() {
            self.finished = true;
            info!("🏁 答题结束: {}/{}", self.score, self.order.len());
            return Ok(Step::Finished(self.history_entry()));
        }

        self.current += 1;
        self.selected = None;
        self.checked = false;
        Ok(Step::Next)
    }

    /// 生成本轮的历史记录
    fn history_entry(&self) -> TestHistory {
        TestHistory {
            file_name: self.file_name.clone(),
            date: chrono::Local::now().timestamp_millis(),
            score: self.score,
            total: self.order.len(),
            mode: self.mode,
        }
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.finished {
            Err(SessionError::Finished)
        } else {
            Ok(())
        }
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    /// 当前是第几题（从1开始）
    pub fn position(&self) -> usize {
        self.current + 1
    }

    pub fn total(&self) -> usize {
        self.order.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn streak(&self) -> usize {
        self.streak
    }

    pub fn best_streak(&self) -> usize {
        self.best_streak
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// 本轮答对的题目在文档中的位置
    pub fn solved(&self) -> &[usize] {
        &self.solved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Answer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(i: usize) -> Question {
        Question {
            id: format!("q-{}", i),
            text: format!("Question {}", i),
            answers: vec![Answer::new("right", true), Answer::new("wrong", false)],
            shuffled_answers: vec![Answer::new("wrong", false), Answer::new("right", true)],
            correct_index: 1,
        }
    }

    fn questions(n: usize) -> Vec<Question> {
        (0..n).map(question).collect()
    }

    fn select(
        mode: QuizMode,
        qs: &[Question],
        bookmarks: &BTreeSet<String>,
        solved: &HashSet<usize>,
    ) -> Result<Vec<usize>, SessionError> {
        select_questions(mode, qs, 25, bookmarks, solved, &mut StdRng::seed_from_u64(3))
    }

    #[test]
    fn test_test_mode_caps_session_size() {
        let qs = questions(40);
        let order = select(QuizMode::Test, &qs, &BTreeSet::new(), &HashSet::new()).unwrap();

        assert_eq!(order.len(), 25);
        let unique: HashSet<usize> = order.iter().copied().collect();
        assert_eq!(unique.len(), 25);
    }

    #[test]
    fn test_speedrun_uses_all_questions() {
        let qs = questions(40);
        let mut order = select(QuizMode::Speedrun, &qs, &BTreeSet::new(), &HashSet::new()).unwrap();

        order.sort_unstable();
        assert_eq!(order, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn test_favorites_in_document_order() {
        let qs = questions(5);
        let bookmarks: BTreeSet<String> = ["q-3", "q-1", "q-unknown"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let order = select(QuizMode::Favorites, &qs, &bookmarks, &HashSet::new()).unwrap();
        assert_eq!(order, vec![1, 3]);

        let err = select(QuizMode::Favorites, &qs, &BTreeSet::new(), &HashSet::new()).unwrap_err();
        assert_eq!(err, SessionError::NoFavorites);
    }

    #[test]
    fn test_preparation_skips_solved() {
        let qs = questions(4);
        let solved: HashSet<usize> = [0, 2].into_iter().collect();

        let mut order = select(QuizMode::Preparation, &qs, &BTreeSet::new(), &solved).unwrap();
        order.sort_unstable();
        assert_eq!(order, vec![1, 3]);

        let all: HashSet<usize> = (0..4).collect();
        let err = select(QuizMode::Preparation, &qs, &BTreeSet::new(), &all).unwrap_err();
        assert_eq!(err, SessionError::AllSolved);
    }

    #[test]
    fn test_no_questions() {
        let err = select(QuizMode::Test, &[], &BTreeSet::new(), &HashSet::new()).unwrap_err();
        assert_eq!(err, SessionError::NoQuestions);
    }

    #[test]
    fn test_scoring_and_streak() {
        let mut session =
            QuizSession::new("a.docx", QuizMode::Test, questions(3), vec![2, 0, 1]).unwrap();

        session.select(1).unwrap();
        let outcome = session.check().unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.streak, 1);
        assert_eq!(session.next().unwrap(), Step::Next);

        session.select(1).unwrap();
        assert_eq!(session.check().unwrap().streak, 2);
        session.next().unwrap();

        session.select(0).unwrap();
        let outcome = session.check().unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.correct_index, 1);
        assert_eq!(session.streak(), 0);
        assert_eq!(session.best_streak(), 2);

        match session.next().unwrap() {
            Step::Finished(history) => {
                assert_eq!(history.score, 2);
                assert_eq!(history.total, 3);
                assert_eq!(history.mode, QuizMode::Test);
                assert_eq!(history.file_name, "a.docx");
            }
            Step::Next => panic!("应该结束"),
        }
        assert_eq!(session.solved(), &[2, 0]);
        assert!(session.current_question().is_none());
        assert_eq!(session.select(0), Err(SessionError::Finished));
    }

    #[test]
    fn test_state_guards() {
        let mut session =
            QuizSession::new("a.docx", QuizMode::Speedrun, questions(2), vec![0, 1]).unwrap();

        assert_eq!(session.check(), Err(SessionError::NoAnswerSelected));
        assert_eq!(session.next(), Err(SessionError::NotChecked));
        assert_eq!(
            session.select(5),
            Err(SessionError::AnswerOutOfRange { index: 5, max_index: 1 })
        );

        session.select(0).unwrap();
        session.check().unwrap();
        assert_eq!(session.select(1), Err(SessionError::AlreadyChecked));
        assert_eq!(session.check(), Err(SessionError::AlreadyChecked));
    }

    #[test]
    fn test_invalid_order_rejected() {
        assert!(QuizSession::new("a", QuizMode::Test, questions(2), vec![]).is_err());
        assert!(QuizSession::new("a", QuizMode::Test, questions(2), vec![5]).is_err());
    }
}
