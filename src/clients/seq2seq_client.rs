/// 问题生成（seq2seq）后端客户端
///
/// 通过 HTTP 调用 text2text-generation 推理端点（如 HuggingFace Inference API）
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// 生成参数：输入截断长度、输出长度上限、beam search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationParams {
    pub max_input_tokens: usize,
    pub max_length: usize,
    pub num_beams: usize,
    pub early_stopping: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_input_tokens: 512,
            max_length: 64,
            num_beams: 4,
            early_stopping: true,
        }
    }
}

/// 序列到序列生成能力：输入文本，返回解码后的文本
#[async_trait]
pub trait Seq2SeqBackend: Send + Sync {
    async fn generate(&self, input: &str, params: &GenerationParams) -> AppResult<String>;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// HTTP 推理端点客户端
pub struct HttpSeq2Seq {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    model_name: String,
}

impl HttpSeq2Seq {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!(
                "{}/models/{}",
                config.qg_api_base_url.trim_end_matches('/'),
                config.qg_model_name
            ),
            token: config.qg_api_token.clone(),
            model_name: config.qg_model_name.clone(),
        }
    }
}

#[async_trait]
impl Seq2SeqBackend for HttpSeq2Seq {
    async fn generate(&self, input: &str, params: &GenerationParams) -> AppResult<String> {
        debug!("调用问题生成端点: {}", self.endpoint);

        let body = request_body(input, params);

        let mut request = self.http.post(&self.endpoint).json(&body);
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }

        let response = request.send().await.map_err(|e| {
            warn!("问题生成请求失败: {}", e);
            AppError::generation(&self.model_name, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::generation(
                &self.model_name,
                format!("HTTP {}: {}", status, text),
            ));
        }

        let outputs: Vec<GeneratedText> = response
            .json()
            .await
            .map_err(|e| AppError::generation(&self.model_name, e))?;

        outputs
            .into_iter()
            .next()
            .map(|o| o.generated_text)
            .ok_or_else(|| AppError::generation(&self.model_name, "端点返回结果为空"))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// 请求体只包含 text2text-generation 端点公开支持的参数，输入长度在客户端截断
fn request_body(input: &str, params: &GenerationParams) -> serde_json::Value {
    json!({
        "inputs": truncate_input(input, params.max_input_tokens),
        "parameters": {
            "max_length": params.max_length,
            "num_beams": params.num_beams,
            "early_stopping": params.early_stopping,
        },
        "options": { "wait_for_model": true },
    })
}

/// 按空白分词近似 token，保留前 `max_tokens` 个词，截掉末尾
///
/// 输入模板把答案放在上下文之前，截断只会丢掉上下文的尾部。
pub fn truncate_input(input: &str, max_tokens: usize) -> &str {
    if max_tokens == 0 {
        return "";
    }
    let mut words = 0;
    let mut in_word = false;
    for (idx, c) in input.char_indices() {
        if c.is_whitespace() {
            if in_word {
                words += 1;
                if words == max_tokens {
                    return input[..idx].trim_start();
                }
            }
            in_word = false;
        } else {
            in_word = true;
        }
    }
    input.trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_is_built_from_config() {
        let config = Config {
            qg_api_base_url: "http://localhost:8080/".to_string(),
            qg_model_name: "valhalla/t5-base-qg-hl".to_string(),
            ..Config::default()
        };
        let client = HttpSeq2Seq::new(&config);
        assert_eq!(client.endpoint, "http://localhost:8080/models/valhalla/t5-base-qg-hl");
        assert_eq!(client.model_name(), "valhalla/t5-base-qg-hl");
    }

    #[test]
    fn test_request_body_sends_only_documented_parameters() {
        let params = GenerationParams::default();
        let body = request_body("generate question: Oxygen </s> context: Plants.", &params);

        assert_eq!(body["inputs"], "generate question: Oxygen </s> context: Plants.");
        let parameters = body["parameters"].as_object().unwrap();
        let mut keys: Vec<&str> = parameters.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["early_stopping", "max_length", "num_beams"]);
        assert_eq!(body["parameters"]["max_length"], 64);
        assert_eq!(body["parameters"]["num_beams"], 4);
    }

    #[test]
    fn test_long_input_is_truncated_on_the_client() {
        let context = vec!["word"; 600].join(" ");
        let input = format!("generate question: Oxygen </s> context: {}", context);
        let params = GenerationParams::default();

        let body = request_body(&input, &params);
        let sent = body["inputs"].as_str().unwrap();
        assert_eq!(sent.split_whitespace().count(), 512);
        assert!(sent.starts_with("generate question: Oxygen </s> context: word"));

        assert_eq!(truncate_input("a b  c d", 2), "a b");
        assert_eq!(truncate_input("a b", 5), "a b");
        assert_eq!(truncate_input("a b", 0), "");
    }

    #[test]
    fn test_default_params_match_qg_model_limits() {
        let params = GenerationParams::default();
        assert_eq!(params.max_input_tokens, 512);
        assert_eq!(params.max_length, 64);
        assert_eq!(params.num_beams, 4);
        assert!(params.early_stopping);
    }
}
