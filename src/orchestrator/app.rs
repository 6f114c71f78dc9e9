//! 应用主结构 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责文档加载、题库管理和答题调度。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志、创建存储和 LLM 服务
//! 2. **文档加载**：解析文档并加入题库（同名文件只保存一次）
//! 3. **选题**：按模式、收藏、学习进度选出本轮题目
//! 4. **答题**：委托 `QuizRunner` 驱动终端交互
//! 5. **收尾**：保存历史记录和学习进度，输出统计

use anyhow::{Context, Result};
use rand::thread_rng;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use tokio::io::AsyncBufRead;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::library::{QuizMode, SavedFile, TestHistory};
use crate::orchestrator::quiz_runner::{QuizRunner, RunOutcome};
use crate::parser;
use crate::services::{LlmService, QuizStore};
use crate::utils::logging;
use crate::workflow::{select_questions, QuizSession};

/// 应用主结构
pub struct App {
    config: Config,
    store: QuizStore,
    llm_service: LlmService,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Self {
        logging::log_startup(&config.data_dir, config.session_size);

        Self {
            store: QuizStore::new(&config),
            llm_service: LlmService::new(&config),
            config,
        }
    }

    pub fn store(&self) -> &QuizStore {
        &self.store
    }

    /// 解析文档并加入题库
    ///
    /// 没有识别出题目时返回 `None`（不是错误）
    pub async fn open_document(&self, path: &Path) -> Result<Option<SavedFile>> {
        info!("\n📁 正在读取文件: {}", path.display());
        let questions = parser::parse_document(path).await?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        if questions.is_empty() {
            warn!("⚠️ 文件 {} 中没有找到题目", file_name);
            return Ok(None);
        }
        logging::log_document_loaded(&file_name, questions.len());

        let saved = SavedFile::new(file_name, questions);
        if self.store.add_to_library(saved.clone()).await? {
            info!("✓ 已加入题库: {}", saved.name);
        }
        Ok(Some(saved))
    }

    /// 从题库中取出文件
    pub async fn load_from_library(&self, id: &str) -> Result<SavedFile> {
        Ok(self.store.find_in_library(id).await?)
    }

    /// 按模式开始一轮答题
    pub async fn start_session(&self, file: &SavedFile, mode: QuizMode) -> Result<QuizSession> {
        let bookmarks = self.store.bookmarks().await;
        let solved_ids = self.store.solved(&file.name).await;
        let solved: HashSet<usize> = file
            .questions
            .iter()
            .enumerate()
            .filter(|(_, q)| solved_ids.contains(&q.id))
            .map(|(i, _)| i)
            .collect();

        let order = select_questions(
            mode,
            &file.questions,
            self.config.session_size,
            &bookmarks,
            &solved,
            &mut thread_rng(),
        )?;

        Ok(QuizSession::new(
            file.name.clone(),
            mode,
            file.questions.clone(),
            order,
        )?)
    }

    /// 运行一轮答题并保存结果
    pub async fn play<R, W>(
        &self,
        file: &SavedFile,
        mode: QuizMode,
        input: R,
        output: W,
    ) -> Result<RunOutcome>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut session = self.start_session(file, mode).await?;

        let outcome = QuizRunner::new(&self.store, &self.llm_service, input, output)
            .run(&mut session)
            .await?;

        let solved_ids: Vec<String> = session
            .solved()
            .iter()
            .map(|&i| file.questions[i].id.clone())
            .collect();
        if !solved_ids.is_empty() {
            self.store
                .mark_solved(&file.name, solved_ids)
                .await
                .context("保存学习进度失败")?;
        }

        match &outcome {
            RunOutcome::Completed(history) => {
                self.store
                    .push_history(history.clone())
                    .await
                    .context("保存历史记录失败")?;
                logging::print_session_stats(history.score, history.total, history.mode.name());
            }
            RunOutcome::Aborted => info!("本轮答题已中止，不保存历史记录"),
        }

        Ok(outcome)
    }

    /// 题库列表
    pub async fn library(&self) -> Vec<SavedFile> {
        self.store.library().await
    }

    /// 从题库删除文件
    pub async fn remove_from_library(&self, id: &str) -> Result<()> {
        self.store.remove_from_library(id).await?;
        info!("✓ 已从题库删除: {}", id);
        Ok(())
    }

    /// 历史记录
    pub async fn history(&self) -> Vec<TestHistory> {
        self.store.history().await
    }

    /// 清空文件的学习进度
    pub async fn reset_progress(&self, file_name: &str) -> Result<()> {
        Ok(self.store.reset_progress(file_name).await?)
    }
}
