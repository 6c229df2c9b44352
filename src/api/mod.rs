//! 边界层
//!
//! 与传输方式无关的请求处理：`audit` / `generate` / `evaluate`。
//! 输入校验在这里完成，流程和服务本身不做边界校验。

pub mod handlers;
pub mod types;

pub use handlers::{audit, audit_response, evaluate, generate, ApiResponse};
pub use types::{
    AuditRequest, AuditResponse, ErrorResponse, EvaluateRequest, EvaluateResponse,
    GenerateRequest, GenerateResponse,
};
