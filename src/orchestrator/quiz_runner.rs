//! 终端答题循环 - 编排层
//!
//! ## 职责
//!
//! 驱动一轮 `QuizSession`：显示题目、读取输入、检查答案、收藏、请求解释。
//!
//! ## 输入命令
//!
//! - `1`..`n`：选择答案并检查
//! - `b`：收藏 / 取消收藏当前题目
//! - `e`：请求 LLM 解释正确答案
//! - `q`：退出本轮
//! - 检查后直接回车进入下一题

use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::models::library::TestHistory;
use crate::models::question::Question;
use crate::services::{LlmService, QuizStore};
use crate::workflow::{QuizSession, Step};

/// 一轮答题的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// 全部题目完成
    Completed(TestHistory),
    /// 用户中途退出或输入结束
    Aborted,
}

/// 用户命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// 选项编号（从1开始）
    Answer(usize),
    Bookmark,
    Explain,
    Quit,
    /// 空输入
    Continue,
    Unknown,
}

fn parse_command(input: &str) -> Command {
    let input = input.trim();
    if input.is_empty() {
        return Command::Continue;
    }
    if let Ok(n) = input.parse::<usize>() {
        return Command::Answer(n);
    }
    match input.to_lowercase().as_str() {
        "b" | "bookmark" => Command::Bookmark,
        "e" | "explain" => Command::Explain,
        "q" | "quit" => Command::Quit,
        _ => Command::Unknown,
    }
}

/// 终端答题循环
pub struct QuizRunner<'a, R, W> {
    store: &'a QuizStore,
    llm_service: &'a LlmService,
    input: R,
    output: W,
}

impl<'a, R, W> QuizRunner<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(store: &'a QuizStore, llm_service: &'a LlmService, input: R, output: W) -> Self {
        Self {
            store,
            llm_service,
            input,
            output,
        }
    }

    /// 运行整轮答题
    pub async fn run(&mut self, session: &mut QuizSession) -> Result<RunOutcome> {
        while let Some(question) = session.current_question().cloned() {
            let mut explanation: Option<String> = None;
            self.render_question(session, &question).await?;

            // ========== 阶段 1: 选择并检查答案 ==========
            while !session.is_checked() {
                let Some(line) = self.read_line().await? else {
                    return Ok(RunOutcome::Aborted);
                };
                match parse_command(&line) {
                    Command::Answer(n) => self.answer(session, &question, n)?,
                    Command::Bookmark => self.toggle_bookmark(&question).await?,
                    Command::Explain => self.explain(&question, &mut explanation).await?,
                    Command::Quit => return Ok(RunOutcome::Aborted),
                    Command::Continue | Command::Unknown => self.print_help()?,
                }
            }

            // ========== 阶段 2: 等待进入下一题 ==========
            loop {
                let Some(line) = self.read_line().await? else {
                    return Ok(RunOutcome::Aborted);
                };
                match parse_command(&line) {
                    Command::Continue => break,
                    Command::Bookmark => self.toggle_bookmark(&question).await?,
                    Command::Explain => self.explain(&question, &mut explanation).await?,
                    Command::Quit => return Ok(RunOutcome::Aborted),
                    Command::Answer(_) | Command::Unknown => {
                        writeln!(self.output, "已检查，回车进入下一题（b 收藏，e 解释，q 退出）")?;
                    }
                }
            }

            if let Step::Finished(history) = session.next()? {
                writeln!(
                    self.output,
                    "\n🏁 本轮结束: {}/{}，最长连对 {}",
                    history.score,
                    history.total,
                    session.best_streak()
                )?;
                return Ok(RunOutcome::Completed(history));
            }
        }

        Ok(RunOutcome::Aborted)
    }

    async fn render_question(&mut self, session: &QuizSession, question: &Question) -> Result<()> {
        let bookmarked = self.store.bookmarks().await.contains(&question.id);

        writeln!(self.output, "\n{}", "─".repeat(60))?;
        writeln!(
            self.output,
            "[{}/{}] 得分 {} | 连对 {}{}",
            session.position(),
            session.total(),
            session.score(),
            session.streak(),
            if bookmarked { " | ★" } else { "" }
        )?;
        writeln!(self.output, "{}", question.text)?;
        for (i, answer) in question.shuffled_answers.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, answer.text)?;
        }
        Ok(())
    }

    fn answer(&mut self, session: &mut QuizSession, question: &Question, n: usize) -> Result<()> {
        let total = question.shuffled_answers.len();
        if n == 0 || n > total {
            writeln!(self.output, "⚠️ 请输入 1-{} 之间的编号", total)?;
            return Ok(());
        }

        session.select(n - 1)?;
        let outcome = session.check()?;
        if outcome.correct {
            writeln!(self.output, "✅ 正确！连对 {}", outcome.streak)?;
        } else {
            let right = question
                .shuffled_answers
                .get(outcome.correct_index)
                .map(|a| a.text.as_str())
                .unwrap_or_default();
            writeln!(
                self.output,
                "❌ 错误。正确答案: {}) {}",
                outcome.correct_index + 1,
                right
            )?;
        }
        Ok(())
    }

    async fn toggle_bookmark(&mut self, question: &Question) -> Result<()> {
        let bookmarked = self.store.toggle_bookmark(&question.id).await?;
        let message = if bookmarked { "★ 已收藏" } else { "☆ 已取消收藏" };
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    async fn explain(&mut self, question: &Question, cache: &mut Option<String>) -> Result<()> {
        if cache.is_none() {
            writeln!(self.output, "🤖 正在请求解释...")?;
            match self.llm_service.explain(question).await {
                Ok(text) => *cache = Some(text),
                Err(e) => {
                    warn!("获取解释失败: {}", e);
                    writeln!(self.output, "⚠️ AI 解释失败，请检查网络和 API Key")?;
                    return Ok(());
                }
            }
        }

        if let Some(text) = cache.as_deref() {
            writeln!(self.output, "💡 {}", text)?;
        }
        Ok(())
    }

    fn print_help(&mut self) -> Result<()> {
        writeln!(self.output, "输入选项编号作答；b 收藏，e 解释，q 退出")?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        write!(self.output, "> ")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).await?;
        if read == 0 {
            debug!("输入结束");
            return Ok(None);
        }
        Ok(Some(line))
    }
}
