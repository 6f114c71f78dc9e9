use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档读取错误
    #[error("文档错误: {0}")]
    Document(#[from] DocumentError),
    /// 本地存储错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 答题会话错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 文档读取错误
///
/// 对用户只暴露一种失败：文件无法读取。具体原因保留在 `source` 中用于日志。
#[derive(Debug, Error)]
pub enum DocumentError {
    /// 文件无法读取（格式损坏、不支持或 IO 失败）
    #[error("无法读取文件 {path}，请检查文件格式是否为 .docx 或纯文本")]
    Unreadable {
        path: String,
        #[source]
        source: ExtractError,
    },
}

/// 文本提取错误（文本提取协作者返回）
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 不支持的文件类型
    #[error("不支持的文件类型: {extension}")]
    Unsupported { extension: String },
    /// 压缩包损坏或缺少正文
    #[error("无法打开文档容器: {0}")]
    Archive(#[from] zip::result::ZipError),
    /// XML 解析失败
    #[error("XML解析失败: {0}")]
    Xml(String),
    /// 文本不是合法的 UTF-8
    #[error("文本编码错误: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    /// IO 错误
    #[error("读取失败: {0}")]
    Io(#[from] std::io::Error),
}

/// 本地存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 写入存储文件失败
    #[error("写入存储文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 序列化失败
    #[error("JSON序列化失败: {0}")]
    Json(#[from] serde_json::Error),
    /// 题库中不存在该文件
    #[error("题库中不存在文件: {id}")]
    FileNotFound { id: String },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 未配置 API Key
    #[error("未配置 LLM API Key")]
    MissingApiKey,
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: async_openai::error::OpenAIError,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 答题会话错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// 没有可用的题目
    #[error("没有可用的题目")]
    NoQuestions,
    /// 收藏模式下没有收藏的题目
    #[error("当前文件中还没有收藏的题目")]
    NoFavorites,
    /// 练习模式下所有题目都已完成
    #[error("所有题目都已学完")]
    AllSolved,
    /// 选项索引超出范围
    #[error("选项 {index} 超出范围 [0, {max_index}]")]
    AnswerOutOfRange { index: usize, max_index: usize },
    /// 未选择答案
    #[error("请先选择一个答案")]
    NoAnswerSelected,
    /// 当前题目已检查
    #[error("当前题目已经检查过")]
    AlreadyChecked,
    /// 当前题目尚未检查
    #[error("当前题目尚未检查")]
    NotChecked,
    /// 会话已结束
    #[error("会话已结束")]
    Finished,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文档无法读取错误
    pub fn document_unreadable(path: impl Into<String>, source: ExtractError) -> Self {
        AppError::Document(DocumentError::Unreadable {
            path: path.into(),
            source,
        })
    }

    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: async_openai::error::OpenAIError,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_error_hides_cause_in_message() {
        let err = AppError::document_unreadable(
            "broken.docx",
            ExtractError::Xml("unexpected eof".to_string()),
        );

        let message = err.to_string();
        assert!(message.contains("broken.docx"));
        assert!(!message.contains("unexpected eof"));

        let source = std::error::Error::source(&err).expect("应包含来源错误");
        assert!(source.to_string().contains("broken.docx"));
    }

    #[test]
    fn test_session_error_converts_into_app_error() {
        let err: AppError = SessionError::NoFavorites.into();
        assert!(matches!(err, AppError::Session(SessionError::NoFavorites)));
    }
}
