use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tokio::io::BufReader;

use quiz_master::utils::logging;
use quiz_master::{App, Config, QuizMode, SavedFile};

/// 从 Word 文档生成选择题测验
#[derive(Parser, Debug)]
#[command(name = "quiz_master", version, about)]
struct Cli {
    /// 配置文件路径
    #[arg(long, default_value = "quiz_master.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// 读取文档并开始答题
    Open {
        /// .docx 或 .txt 文件
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = ModeArg::Test)]
        mode: ModeArg,
    },
    /// 用题库中的文件答题
    Play {
        /// 题库文件 ID
        id: String,
        #[arg(long, value_enum, default_value_t = ModeArg::Test)]
        mode: ModeArg,
    },
    /// 列出题库
    Library,
    /// 从题库删除文件
    Remove {
        /// 题库文件 ID
        id: String,
    },
    /// 查看历史记录
    History,
    /// 清空某个文件的学习进度
    Reset {
        /// 文件名
        file_name: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Test,
    Preparation,
    Speedrun,
    Favorites,
}

impl From<ModeArg> for QuizMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Test => QuizMode::Test,
            ModeArg::Preparation => QuizMode::Preparation,
            ModeArg::Speedrun => QuizMode::Speedrun,
            ModeArg::Favorites => QuizMode::Favorites,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(&cli.config)?;

    // 初始化日志
    logging::init(config.verbose_logging);

    let app = App::initialize(config);

    match cli.command {
        CliCommand::Open { path, mode } => open_and_play(&app, &path, mode.into()).await?,
        CliCommand::Play { id, mode } => {
            let file = app.load_from_library(&id).await?;
            play(&app, &file, mode.into()).await?;
        }
        CliCommand::Library => print_library(&app).await,
        CliCommand::Remove { id } => app.remove_from_library(&id).await?,
        CliCommand::History => print_history(&app).await,
        CliCommand::Reset { file_name } => app.reset_progress(&file_name).await?,
    }

    Ok(())
}

async fn open_and_play(app: &App, path: &Path, mode: QuizMode) -> Result<()> {
    match app.open_document(path).await? {
        Some(file) => play(app, &file, mode).await,
        None => {
            println!("文件中没有找到题目，请检查题目格式（如 \"1. 题干\" 和 \"a) 选项\"）");
            Ok(())
        }
    }
}

async fn play(app: &App, file: &SavedFile, mode: QuizMode) -> Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    app.play(file, mode, input, std::io::stdout()).await?;
    Ok(())
}

async fn print_library(app: &App) {
    let library = app.library().await;
    if library.is_empty() {
        println!("题库为空");
        return;
    }

    for file in library {
        println!("{} | {} | {} 道题", file.id, file.name, file.questions.len());
    }
}

async fn print_history(app: &App) {
    let history = app.history().await;
    if history.is_empty() {
        println!("暂无历史记录");
        return;
    }

    for entry in history {
        println!("{}", entry);
    }
}
