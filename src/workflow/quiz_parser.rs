//! QuizMaster 输出解析
//!
//! 生成式输出不可信：即使 prompt 禁止了 markdown 代码块，这里仍先去掉代码块标记再解析。
//! 解析失败时返回带原文的兜底记录，由流水线决定如何记录。

use thiserror::Error;

use crate::models::{QuestionRecord, QuizQuestion};

/// 测验解析错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizParseError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Quiz contains no questions")]
    Empty,

    #[error("Question {index} has no text")]
    BlankQuestion { index: usize },

    #[error("Question {index} has fewer than two options")]
    TooFewOptions { index: usize },

    #[error("Question {index}: answer {answer:?} is not one of the options")]
    AnswerNotInOptions { index: usize, answer: String },
}

/// 去掉 ```json 与 ``` 标记并去除首尾空白
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// 解析并校验测验
///
/// 每道题必须有题干、至少两个选项，且答案必须是选项之一（忽略首尾空白）。
///
/// 校验是整体的：只要有一道题不合格，整份测验都作废并返回错误，
/// 其余合格的题目不会保留。调用方拿到的要么是全部题目，要么是兜底记录。
pub fn parse_quiz(raw: &str) -> Result<Vec<QuizQuestion>, QuizParseError> {
    let clean = strip_code_fences(raw);
    let questions: Vec<QuizQuestion> =
        serde_json::from_str(&clean).map_err(|e| QuizParseError::InvalidJson(e.to_string()))?;

    if questions.is_empty() {
        return Err(QuizParseError::Empty);
    }

    for (i, q) in questions.iter().enumerate() {
        let index = i + 1;
        if q.question.trim().is_empty() {
            return Err(QuizParseError::BlankQuestion { index });
        }
        if q.options.len() < 2 {
            return Err(QuizParseError::TooFewOptions { index });
        }
        if !q.answer_in_options() {
            return Err(QuizParseError::AnswerNotInOptions {
                index,
                answer: q.answer.clone(),
            });
        }
    }

    Ok(questions)
}

/// 解析为测验记录；失败时返回单条兜底记录（保留原文）和错误
pub fn parse_quiz_records(raw: &str) -> (Vec<QuestionRecord>, Option<QuizParseError>) {
    match parse_quiz(raw) {
        Ok(questions) => (
            questions.into_iter().map(QuestionRecord::Question).collect(),
            None,
        ),
        Err(e) => (vec![QuestionRecord::parse_failure(e.to_string(), raw)], Some(e)),
    }
}
