//! 答案评估服务
//!
//! 用向量余弦相似度比较学生答案与参考答案，并按固定阈值给出反馈

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::clients::Embedder;
use crate::error::{AppError, AppResult};

pub const MISSING_CONTENT_FEEDBACK: &str = "Missing answer content.";

/// 反馈分档：相似度严格大于阈值即命中，按降序检查
const FEEDBACK_TIERS: [(f64, &str); 4] = [
    (0.85, "Excellent! Your answer is semantically identical to the reference."),
    (0.70, "Good job. You captured the main concept, but missed some nuance."),
    (0.50, "You're on the right track, but the answer is incomplete or slightly off-topic."),
    (0.30, "Some relevance found, but significant details are missing."),
];
const FALLBACK_FEEDBACK: &str = "Incorrect. Your answer does not match the context.";

/// 评估结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// 0–100，保留两位小数
    pub score: f64,
    pub feedback: String,
}

/// 答案评估器
pub struct AnswerEvaluator {
    embedder: Arc<dyn Embedder>,
}

impl AnswerEvaluator {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// 评估学生答案
    ///
    /// 任一输入为空时直接返回 0 分，不调用后端
    pub async fn evaluate(&self, student_answer: &str, reference_answer: &str) -> AppResult<Evaluation> {
        if student_answer.trim().is_empty() || reference_answer.trim().is_empty() {
            return Ok(Evaluation {
                score: 0.0,
                feedback: MISSING_CONTENT_FEEDBACK.to_string(),
            });
        }

        let texts = [student_answer.to_string(), reference_answer.to_string()];
        let embeddings = self.embedder.embed(&texts).await?;
        let (student, reference) = match embeddings.as_slice() {
            [student, reference] => (student, reference),
            other => {
                return Err(AppError::embedding(
                    self.embedder.model_name(),
                    format!("期望 2 个向量，实际返回 {} 个", other.len()),
                ))
            }
        };

        let similarity = cosine_similarity(student, reference)
            .ok_or_else(|| AppError::embedding(self.embedder.model_name(), "向量维度不一致"))?;

        debug!("相似度: {:.4}", similarity);

        Ok(Evaluation {
            score: to_percentage(similarity),
            feedback: feedback_for(similarity).to_string(),
        })
    }
}

/// 余弦相似度；维度不一致返回 None，零向量视为 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Some(0.0);
    }
    Some((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

/// 相似度 → 百分制分数（两位小数）
pub fn to_percentage(similarity: f64) -> f64 {
    (similarity * 100.0 * 100.0).round() / 100.0
}

/// 按未缩放的相似度选择反馈
pub fn feedback_for(similarity: f64) -> &'static str {
    FEEDBACK_TIERS
        .iter()
        .find(|(threshold, _)| similarity > *threshold)
        .map(|(_, feedback)| *feedback)
        .unwrap_or(FALLBACK_FEEDBACK)
}
