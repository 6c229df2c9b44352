//! 向量后端：调用 OpenAI 兼容的 /embeddings 端点

use async_openai::config::OpenAIConfig;
use async_openai::types::embeddings::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// 文本向量化能力：一次调用编码多段文本，返回顺序与输入一致
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    fn model_name(&self) -> &str;
}

/// 使用 async-openai 调用 embeddings API
pub struct OpenAiEmbedder {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl OpenAiEmbedder {
    /// 与 LLM 共用 api key
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.embedding_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.embedding_model_name.clone(),
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        debug!("调用 Embedding API，模型: {}, 文本数: {}", self.model_name, texts.len());

        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model_name)
            .input(EmbeddingInput::StringArray(texts.to_vec()))
            .build()
            .map_err(|e| AppError::embedding(&self.model_name, e))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| {
                warn!("Embedding API 调用失败: {}", e);
                AppError::embedding(&self.model_name, e)
            })?;

        let mut data = response.data;
        if data.len() != texts.len() {
            return Err(AppError::embedding(
                &self.model_name,
                format!("期望 {} 个向量，实际返回 {} 个", texts.len(), data.len()),
            ));
        }
        data.sort_by_key(|e| e.index);

        Ok(data.into_iter().map(|e| e.embedding).collect())
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
