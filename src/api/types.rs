//! 边界层请求/响应结构

use serde::{Deserialize, Serialize};

use crate::models::{QuestionRecord, SessionState};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResponse {
    pub summary: String,
    pub quiz: Vec<QuestionRecord>,
    pub logs: Vec<String>,
}

impl From<&SessionState> for AuditResponse {
    fn from(state: &SessionState) -> Self {
        Self {
            summary: state.analysis_report().to_string(),
            quiz: state.generated_quiz().to_vec(),
            logs: state.logs().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub status: String,
    pub question: String,
    pub reference_answer: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub student_answer: Option<String>,
    #[serde(default)]
    pub reference_answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub status: String,
    pub score: f64,
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
