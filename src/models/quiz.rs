use serde::{Deserialize, Serialize};

/// 一道选择题（QuizMaster 输出的单个对象）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuizQuestion {
    /// 答案是否是选项之一（忽略首尾空白）
    pub fn answer_in_options(&self) -> bool {
        let answer = self.answer.trim();
        self.options.iter().any(|option| option.trim() == answer)
    }
}

/// 测验记录：有效题目，或解析失败的兜底记录
///
/// 序列化时以 `status` 字段区分，下游不需要依赖字段是否存在来判断。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuestionRecord {
    Question(QuizQuestion),
    ParseFailure { error: String, raw: String },
}

impl QuestionRecord {
    pub fn parse_failure(error: impl Into<String>, raw: impl Into<String>) -> Self {
        QuestionRecord::ParseFailure {
            error: error.into(),
            raw: raw.into(),
        }
    }

    pub fn is_question(&self) -> bool {
        matches!(self, QuestionRecord::Question(_))
    }

    pub fn as_question(&self) -> Option<&QuizQuestion> {
        match self {
            QuestionRecord::Question(q) => Some(q),
            QuestionRecord::ParseFailure { .. } => None,
        }
    }
}
