/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// `RUST_LOG` 优先；未设置时 verbose 模式为 debug，否则为 info。
/// 重复调用是安全的（测试中会多次调用）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `data_dir`: 数据目录
/// - `session_size`: 每轮题目数
pub fn log_startup(data_dir: &str, session_size: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 QuizMaster 启动");
    info!("📁 数据目录: {}", data_dir);
    info!("📊 每轮题目数: {}", session_size);
    info!("{}", "=".repeat(60));
}

/// 记录文档加载信息
pub fn log_document_loaded(file_name: &str, total: usize) {
    info!("✓ 文件 {} 解析完成，共 {} 道题", file_name, total);
}

/// 打印单轮答题统计
///
/// # 参数
/// - `score`: 答对数量
/// - `total`: 题目总数
/// - `mode`: 模式名称
pub fn print_session_stats(score: usize, total: usize, mode: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 本轮答题完成 ({})", mode);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 答对: {}/{}", score, total);
    info!("❌ 答错: {}", total.saturating_sub(score));
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
