use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::{AppError, AppResult};

/// 程序配置
///
/// 三个后端（文本生成 / 向量 / 问题生成）都在进程启动时构建一次，之后在所有请求间复用。
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 审计报告输出文件
    pub output_log_file: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    // --- Embedding 配置（与 LLM 共用 api key） ---
    pub embedding_api_base_url: String,
    pub embedding_model_name: String,
    // --- 问题生成（seq2seq）配置 ---
    pub qg_api_base_url: String,
    pub qg_model_name: String,
    pub qg_api_token: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose_logging: false,
            output_log_file: "audit_report.txt".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_temperature: 0.3,
            llm_max_tokens: 2048,
            embedding_api_base_url: "https://api.openai.com/v1".to_string(),
            embedding_model_name: "text-embedding-3-small".to_string(),
            qg_api_base_url: "https://api-inference.huggingface.co".to_string(),
            qg_model_name: "valhalla/t5-base-qg-hl".to_string(),
            qg_api_token: String::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_temperature: std::env::var("LLM_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_temperature),
            llm_max_tokens: std::env::var("LLM_MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_max_tokens),
            embedding_api_base_url: std::env::var("EMBEDDING_API_BASE_URL").unwrap_or(default.embedding_api_base_url),
            embedding_model_name: std::env::var("EMBEDDING_MODEL_NAME").unwrap_or(default.embedding_model_name),
            qg_api_base_url: std::env::var("QG_API_BASE_URL").unwrap_or(default.qg_api_base_url),
            qg_model_name: std::env::var("QG_MODEL_NAME").unwrap_or(default.qg_model_name),
            qg_api_token: std::env::var("QG_API_TOKEN").unwrap_or(default.qg_api_token),
        }
    }

    /// 从 TOML 文件加载配置，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("无法读取配置文件 {}: {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 缺少 API key 时给出提示（不阻止启动，后端调用失败会以文本形式记录在结果中）
    pub fn warn_if_incomplete(&self) {
        if self.llm_api_key.is_empty() {
            warn!("⚠️ 未设置 LLM_API_KEY，文本生成与向量后端调用将会失败");
        }
        if self.qg_api_token.is_empty() {
            warn!("⚠️ 未设置 QG_API_TOKEN，问题生成后端可能拒绝请求");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_toml_file_fills_missing_fields_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
llm_model_name = "gemini-1.5-pro"
llm_temperature = 0.1
verbose_logging = true
"#
        )
        .unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();
        assert_eq!(config.llm_model_name, "gemini-1.5-pro");
        assert!((config.llm_temperature - 0.1).abs() < f32::EPSILON);
        assert!(config.verbose_logging);
        assert_eq!(config.qg_model_name, "valhalla/t5-base-qg-hl");
        assert_eq!(config.output_log_file, "audit_report.txt");
    }

    #[test]
    fn test_from_toml_file_rejects_bad_types() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"llm_max_tokens = "lots""#).unwrap();

        let err = Config::from_toml_file(file.path()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::from_toml_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
