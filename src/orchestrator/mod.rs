//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责文档加载和答题调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用主结构
//! - 解析文档、维护题库
//! - 按模式选题（收藏、学习进度）
//! - 保存历史记录和学习进度
//!
//! ### `quiz_runner` - 终端答题循环
//! - 显示题目、读取输入
//! - 驱动 `QuizSession`
//! - 收藏、请求解释
//!
//! ## 层次关系
//!
//! ```text
//! app (处理文件和题库)
//!     ↓
//! quiz_runner (处理一轮答题的交互)
//!     ↓
//! workflow::QuizSession (答题状态机)
//!     ↓
//! services (能力层：store / llm)    parser (题目解析)
//!                                       ↓
//!                          infrastructure (文本提取)
//! ```

pub mod app;
pub mod quiz_runner;

// 重新导出主要类型
pub use app::App;
pub use quiz_runner::{QuizRunner, RunOutcome};
