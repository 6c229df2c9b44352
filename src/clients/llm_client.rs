//! 文本生成后端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// 文本补全能力：输入完整 prompt，返回生成的文本
///
/// 实现方需要自行保证可重入；流水线不会为后端加锁。
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, prompt: &str) -> AppResult<String>;

    /// 模型名称（用于日志）
    fn model_name(&self) -> &str;
}

/// OpenAI 兼容的文本补全客户端
pub struct OpenAiCompletion {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiCompletion {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        }
    }
}

#[async_trait]
impl TextCompletion for OpenAiCompletion {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("Prompt 长度: {} 字符", prompt.len());

        // 身份、上下文和任务已经拼在同一条 prompt 中，这里只发送一条用户消息
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| AppError::llm(&self.model_name, e))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| AppError::llm(&self.model_name, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::llm(&self.model_name, "LLM 返回内容为空"))?;

        Ok(content.trim().to_string())
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
