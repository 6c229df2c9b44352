//! 问题生成服务
//!
//! 从上下文中挑选一段作为"答案"，交给 seq2seq 模型生成针对该答案的问题。
//! 挑出的答案同时作为后续评估用的参考答案返回。

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::clients::{GenerationParams, Seq2SeqBackend};
use crate::error::{AppError, AppResult};
use crate::utils::truncate_text;

/// 上下文最少需要的非空白字符数
const MIN_CONTEXT_CHARS: usize = 10;
/// 没有句子可选时截取的字符数
const FALLBACK_ANSWER_CHARS: usize = 50;

/// 生成结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedQuestion {
    pub question: String,
    pub reference_answer: String,
}

/// 问题生成器
pub struct QuestionGenerator {
    backend: Arc<dyn Seq2SeqBackend>,
    params: GenerationParams,
}

impl QuestionGenerator {
    pub fn new(backend: Arc<dyn Seq2SeqBackend>) -> Self {
        Self {
            backend,
            params: GenerationParams::default(),
        }
    }

    /// 根据上下文生成一个问题
    pub async fn generate(&self, context_text: &str) -> AppResult<GeneratedQuestion> {
        let meaningful = context_text.chars().filter(|c| !c.is_whitespace()).count();
        if meaningful < MIN_CONTEXT_CHARS {
            return Err(AppError::validation("Context text is too short."));
        }

        let target_answer = extract_likely_answer(context_text);
        debug!("选中的答案片段: {}", truncate_text(&target_answer, 80));

        let input_text = prepare_input(context_text, &target_answer);
        let decoded = self.backend.generate(&input_text, &self.params).await?;

        let question = decoded.trim().to_string();
        if question.is_empty() {
            return Err(AppError::generation(self.backend.model_name(), "模型返回空问题"));
        }

        info!("✓ 问题生成完成: {}", truncate_text(&question, 80));

        Ok(GeneratedQuestion {
            question,
            reference_answer: target_answer,
        })
    }
}

/// 模型要求的输入格式
fn prepare_input(context: &str, answer: &str) -> String {
    format!("generate question: {} </s> context: {}", answer, context)
}

/// 挑选答案片段：默认第一句，优先第一个长度在 (20, 150) 之间的句子；
/// 没有句子时取原文前 50 个字符
pub fn extract_likely_answer(text: &str) -> String {
    let sentences = split_sentences(text);
    let Some(first) = sentences.first() else {
        return text.chars().take(FALLBACK_ANSWER_CHARS).collect();
    };

    sentences
        .iter()
        .find(|s| {
            let len = s.chars().count();
            20 < len && len < 150
        })
        .unwrap_or(first)
        .to_string()
}

/// 句点后不断句的常见缩写（小写、不含末尾句点）
const ABBREVIATIONS: &[&str] = &[
    "dr", "mr", "mrs", "ms", "st", "prof", "jr", "sr", "vs", "etc", "e.g", "i.e", "fig",
];

/// 句点前的词是否为缩写或单个大写首字母（如 `Dr.`、`e.g.`、`J.`）
fn is_abbreviation(before_period: &str) -> bool {
    let token = before_period
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .trim_start_matches(|c: char| matches!(c, '(' | '[' | '"' | '\''));

    let mut chars = token.chars();
    if let (Some(initial), None) = (chars.next(), chars.next()) {
        return initial.is_uppercase();
    }
    ABBREVIATIONS.contains(&token.to_lowercase().as_str())
}

/// 在 `.` `!` `?` 后接空白或文本结尾处断句，去除首尾空白并丢弃空句
///
/// 缩写和姓名首字母后的句点不视为句子结尾，如 "Dr. Smith"、"St. Mary's"。
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = match chars.peek() {
            None => true,
            Some((_, next)) => next.is_whitespace(),
        };
        if at_boundary && !(c == '.' && is_abbreviation(&text[start..idx])) {
            let end = idx + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mock::MockSeq2Seq;

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("Plants grow. Do they breathe?  Yes!\nThey do");
        assert_eq!(sentences, vec!["Plants grow.", "Do they breathe?", "Yes!", "They do"]);
        assert!(split_sentences("   ").is_empty());
        // 小数点后没有空白，不会断句
        assert_eq!(split_sentences("Pi is 3.14 roughly."), vec!["Pi is 3.14 roughly."]);
    }

    #[test]
    fn test_split_keeps_abbreviations_inside_sentence() {
        let text = "Dr. Smith discovered Penicillin in 1928 at St. Mary's. It changed medicine forever.";
        assert_eq!(
            split_sentences(text),
            vec![
                "Dr. Smith discovered Penicillin in 1928 at St. Mary's.",
                "It changed medicine forever.",
            ]
        );
        assert_eq!(
            extract_likely_answer(text),
            "Dr. Smith discovered Penicillin in 1928 at St. Mary's."
        );

        let sentences = split_sentences("J. K. Rowling wrote books, e.g. novels. Prof. Lee agreed.");
        assert_eq!(sentences, vec!["J. K. Rowling wrote books, e.g. novels.", "Prof. Lee agreed."]);
    }

    #[test]
    fn test_prefers_first_mid_length_sentence() {
        let short = "Short one."; // 10
        let medium = "This sentence is thirty chars."; // 30
        let long = format!("{}.", "a".repeat(199)); // 200
        assert_eq!(short.chars().count(), 10);
        assert_eq!(medium.chars().count(), 30);

        let text = format!("{} {} {}", short, medium, long);
        assert_eq!(extract_likely_answer(&text), medium);
    }

    #[test]
    fn test_defaults_to_first_sentence_when_none_fit() {
        let long = format!("{}.", "b".repeat(199));
        let text = format!("Tiny one. {}", long);
        assert_eq!(extract_likely_answer(&text), "Tiny one.");
    }

    #[test]
    fn test_falls_back_to_raw_prefix_without_sentences() {
        assert_eq!(extract_likely_answer(""), "");
        let text = " ".repeat(60);
        assert_eq!(extract_likely_answer(&text).chars().count(), 50);
    }

    #[tokio::test]
    async fn test_short_context_is_rejected_without_backend_call() {
        let backend = Arc::new(MockSeq2Seq::replying("unused"));
        let generator = QuestionGenerator::new(backend.clone());

        let err = generator.generate("short").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Context text is too short.");

        // 空白不计入
        let err = generator.generate("a b c d e f g h i").await.unwrap_err();
        assert!(err.is_validation());
        assert!(backend.inputs().is_empty());
    }

    #[tokio::test]
    async fn test_generate_builds_template_and_returns_span() {
        let backend = Arc::new(MockSeq2Seq::replying("  What do plants release?  "));
        let generator = QuestionGenerator::new(backend.clone());

        let context = "Plants release oxygen during photosynthesis. It is vital.";
        let result = generator.generate(context).await.unwrap();

        assert_eq!(result.question, "What do plants release?");
        assert_eq!(result.reference_answer, "Plants release oxygen during photosynthesis.");

        let inputs = backend.inputs();
        assert_eq!(inputs.len(), 1);
        assert_eq!(
            inputs[0].0,
            format!(
                "generate question: Plants release oxygen during photosynthesis. </s> context: {}",
                context
            )
        );
        assert_eq!(inputs[0].1, GenerationParams::default());
    }

    #[tokio::test]
    async fn test_backend_failure_is_generation_error() {
        let generator = QuestionGenerator::new(Arc::new(MockSeq2Seq::failing("model loading")));
        let err = generator
            .generate("Plants release oxygen during photosynthesis.")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Generation { .. }));
    }

    #[tokio::test]
    async fn test_empty_decode_is_generation_error() {
        let generator = QuestionGenerator::new(Arc::new(MockSeq2Seq::replying("   ")));
        let err = generator
            .generate("Plants release oxygen during photosynthesis.")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Generation { .. }));
    }
}
