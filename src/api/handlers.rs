//! 请求处理
//!
//! 只有输入校验失败以 4xx 返回；其它错误在服务端完整记录，对调用方只返回笼统的 5xx 信息。

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{error, info, warn};

use crate::api::types::{
    AuditRequest, AuditResponse, EvaluateRequest, EvaluateResponse,
    GenerateRequest, GenerateResponse,
};
use crate::app::App;
use crate::error::AppError;
use crate::models::SessionState;

const NO_TEXT: &str = "No text provided";
const MISSING_ANSWER: &str = "Missing student answer or reference context";
const GENERATION_FAILED: &str = "Internal Server Error during generation";
const EVALUATION_FAILED: &str = "Internal Server Error during evaluation";

/// 传输无关的响应：状态码 + JSON 体
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: JsonValue,
}

impl ApiResponse {
    fn ok<T: Serialize>(body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self {
                status: StatusCode::OK,
                body,
            },
            Err(e) => {
                error!("响应序列化失败: {}", e);
                Self::error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }

    fn error(status: StatusCode, message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self {
            status,
            body: serde_json::json!({ "error": message }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// 非空（去除首尾空白后）的字段
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// 运行完整审计流程
pub async fn audit(app: &App, request: AuditRequest) -> ApiResponse {
    let Some(text) = non_blank(request.text) else {
        warn!("⚠️ audit 请求缺少文本");
        return ApiResponse::error(StatusCode::BAD_REQUEST, NO_TEXT);
    };
    let session_id = request
        .session_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("web-req-{}", chrono::Utc::now().timestamp_millis()));

    info!("📥 audit 请求: 会话 {}", session_id);
    let state = app.orchestrator().process_content(&session_id, &text).await;
    audit_response(&state)
}

/// 已完成的会话状态 → audit 响应
pub fn audit_response(state: &SessionState) -> ApiResponse {
    ApiResponse::ok(&AuditResponse::from(state))
}

/// 根据上下文生成一个问题
pub async fn generate(app: &App, request: GenerateRequest) -> ApiResponse {
    let Some(context) = non_blank(request.context) else {
        return ApiResponse::error(StatusCode::BAD_REQUEST, NO_TEXT);
    };

    match app.generator().generate(&context).await {
        Ok(result) => ApiResponse::ok(&GenerateResponse {
            status: "success".to_string(),
            question: result.question,
            reference_answer: result.reference_answer,
        }),
        Err(AppError::Validation(message)) => ApiResponse::error(StatusCode::BAD_REQUEST, message),
        Err(e) => {
            error!("❌ 问题生成失败: {:?}", e);
            ApiResponse::error(StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED)
        }
    }
}

/// 评估学生答案
pub async fn evaluate(app: &App, request: EvaluateRequest) -> ApiResponse {
    let (Some(student), Some(reference)) = (
        non_blank(request.student_answer),
        non_blank(request.reference_answer),
    ) else {
        return ApiResponse::error(StatusCode::BAD_REQUEST, MISSING_ANSWER);
    };

    match app.evaluator().evaluate(&student, &reference).await {
        Ok(evaluation) => ApiResponse::ok(&EvaluateResponse {
            status: "success".to_string(),
            score: evaluation.score,
            feedback: evaluation.feedback,
        }),
        Err(AppError::Validation(message)) => ApiResponse::error(StatusCode::BAD_REQUEST, message),
        Err(e) => {
            error!("❌ 答案评估失败: {:?}", e);
            ApiResponse::error(StatusCode::INTERNAL_SERVER_ERROR, EVALUATION_FAILED)
        }
    }
}
