//! LLM 服务 - 业务能力层
//!
//! 只负责"解释答案"能力，不关心答题流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};
use crate::models::question::Question;

/// 解释答案时使用的系统提示词
const EXPLAIN_SYSTEM_MESSAGE: &str = "你是一位专业、简洁的老师。你的任务是解释为什么这个答案是正确的。\
                                      回答尽量简短，不要寒暄。使用与题目相同的语言回答。";

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 解释单道题的正确答案
/// - 提供通用的 LLM 调用接口
/// - 不关心会话状态和得分
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    has_api_key: bool,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
            has_api_key: !config.llm_api_key.trim().is_empty(),
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（已去掉首尾空白）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> AppResult<String> {
        if !self.has_api_key {
            return Err(LlmError::MissingApiKey.into());
        }

        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let request = self
            .build_request(user_message, system_message)
            .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;

        // 调用 API
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content)
    }

    /// 解释一道题的正确答案
    pub async fn explain(&self, question: &Question) -> AppResult<String> {
        let user_message = build_explain_message(question);
        self.send_to_llm(&user_message, Some(EXPLAIN_SYSTEM_MESSAGE))
            .await
    }

    fn build_request(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<
        async_openai::types::chat::CreateChatCompletionRequest,
        async_openai::error::OpenAIError,
    > {
        let mut messages = Vec::new();

        // 添加系统消息（如果提供）
        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.3)
            .max_tokens(512u32)
            .build()
    }
}

/// 构建解释请求的用户消息
///
/// 正确答案取自展示顺序（`shuffled_answers[correct_index]`）
fn build_explain_message(question: &Question) -> String {
    let answer = question
        .correct_answer()
        .map(|a| a.text.as_str())
        .unwrap_or_default();
    format!("题目: {}\n答案: {}", question.text, answer)
}
