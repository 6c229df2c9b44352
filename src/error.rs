//! 错误类型
//!
//! 按来源划分：输入校验 / 生成式后端 / 向量后端 / 问题生成后端 / 配置。
//! 只有输入校验错误会以客户端错误的形式返回给调用方，其余错误在边界层统一转换。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入校验错误（空文本、上下文过短、缺少字段）
    #[error("{0}")]
    Validation(String),

    /// 生成式文本后端错误
    #[error("LLM错误 (模型: {model}): {message}")]
    Llm { model: String, message: String },

    /// 向量（相似度）后端错误
    #[error("Embedding错误 (模型: {model}): {message}")]
    Embedding { model: String, message: String },

    /// 序列到序列问题生成后端错误
    #[error("问题生成错误 (模型: {model}): {message}")]
    Generation { model: String, message: String },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 文件读写错误
    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建输入校验错误
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// 创建LLM调用错误
    pub fn llm(model: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AppError::Llm {
            model: model.into(),
            message: message.to_string(),
        }
    }

    /// 创建Embedding调用错误
    pub fn embedding(model: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AppError::Embedding {
            model: model.into(),
            message: message.to_string(),
        }
    }

    /// 创建问题生成错误
    pub fn generation(model: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AppError::Generation {
            model: model.into(),
            message: message.to_string(),
        }
    }

    /// 是否为输入校验错误（边界层据此返回 4xx）
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_passed_through() {
        let err = AppError::validation("Context text is too short.");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Context text is too short.");
    }

    #[test]
    fn test_backend_errors_are_not_validation() {
        let err = AppError::embedding("text-embedding-3-small", "connection refused");
        assert!(!err.is_validation());
        assert!(err.to_string().contains("connection refused"));
    }
}
