//! # QuizMaster
//!
//! 一个从 Word 文档生成选择题测验的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 文本提取能力，不认识题目
//! - `TextExtractor` - docx / 纯文本 → 文本
//!
//! ### ② 解析层（Parser）
//! - `parser/` - 行分类 → 题目构建 → 稳定 ID → 选项打乱
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `QuizStore` - 题库、历史记录、收藏、学习进度
//! - `LlmService` - LLM 解释答案
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - 定义"一轮答题"的状态机
//! - `QuizSession` - 选题 → 作答 → 检查 → 下一题 → 结束
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/app` - 文档加载、题库、选题、保存结果
//! - `orchestrator/quiz_runner` - 终端交互
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::TextExtractor;
pub use models::{Answer, Question, QuizMode, SavedFile, TestHistory};
pub use orchestrator::{App, RunOutcome};
pub use parser::{parse_document, parse_lines, parse_text};
pub use workflow::{QuizSession, Step};
