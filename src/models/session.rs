//! 会话状态
//!
//! 一次流水线运行对应一个 `SessionState`。状态按所有权在各阶段之间传递，
//! 每个阶段消费旧状态并返回更新后的状态；运行结束后交给调用方，不再修改。

use std::fmt::{self, Display};

use serde::Serialize;
use tracing::{error, info};

use crate::models::quiz::QuestionRecord;

/// 流水线阶段（严格线性，无分支、无重试）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStage {
    Init,
    KeywordsExtracted,
    AnalysisDone,
    QuizParsed,
    Finished,
}

impl PipelineStage {
    /// 下一个阶段；`Finished` 之后没有阶段
    pub fn next(self) -> Option<Self> {
        match self {
            PipelineStage::Init => Some(PipelineStage::KeywordsExtracted),
            PipelineStage::KeywordsExtracted => Some(PipelineStage::AnalysisDone),
            PipelineStage::AnalysisDone => Some(PipelineStage::QuizParsed),
            PipelineStage::QuizParsed => Some(PipelineStage::Finished),
            PipelineStage::Finished => None,
        }
    }
}

/// 追踪日志的步骤标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStep {
    Orchestrator,
    ToolExecution,
    ToolResult,
    AnalystOutput,
    QuizMaster,
    Error,
}

impl TraceStep {
    pub fn tag(self) -> &'static str {
        match self {
            TraceStep::Orchestrator => "ORCHESTRATOR",
            TraceStep::ToolExecution => "TOOL_EXECUTION",
            TraceStep::ToolResult => "TOOL_RESULT",
            TraceStep::AnalystOutput => "ANALYST_OUTPUT",
            TraceStep::QuizMaster => "QUIZ_MASTER",
            TraceStep::Error => "ERROR",
        }
    }
}

impl Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 贯穿整条流水线的累加器
///
/// 字段只能按阶段顺序写入：关键词 → 分析报告 → 测验。
/// `logs` 只追加，顺序即执行顺序。
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    session_id: String,
    source_text: String,
    stage: PipelineStage,
    logs: Vec<String>,
    extracted_keywords: Vec<String>,
    analysis_report: String,
    generated_quiz: Vec<QuestionRecord>,
}

impl SessionState {
    /// 创建新的会话状态（INIT 阶段）
    pub fn new(session_id: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            source_text: source_text.into(),
            stage: PipelineStage::Init,
            logs: Vec::new(),
            extracted_keywords: Vec::new(),
            analysis_report: String::new(),
            generated_quiz: Vec::new(),
        }
    }

    /// 追加一条追踪日志，同时输出到 tracing
    pub fn log(&mut self, step: TraceStep, message: impl AsRef<str>) {
        let entry = format!("[{}]: {}", step, message.as_ref());
        if step == TraceStep::Error {
            error!("[会话 {}] {}", self.session_id, entry);
        } else {
            info!("[会话 {}] {}", self.session_id, entry);
        }
        self.logs.push(entry);
    }

    /// 写入关键词（INIT → KEYWORDS_EXTRACTED）
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.advance(PipelineStage::KeywordsExtracted);
        self.extracted_keywords = keywords;
        self
    }

    /// 写入分析报告（KEYWORDS_EXTRACTED → ANALYSIS_DONE）
    pub fn with_analysis(mut self, report: String) -> Self {
        self.advance(PipelineStage::AnalysisDone);
        self.analysis_report = report;
        self
    }

    /// 写入测验（ANALYSIS_DONE → QUIZ_PARSED）
    pub fn with_quiz(mut self, quiz: Vec<QuestionRecord>) -> Self {
        debug_assert!(!quiz.is_empty(), "generated quiz must never be empty");
        self.advance(PipelineStage::QuizParsed);
        self.generated_quiz = quiz;
        self
    }

    /// 结束流水线（QUIZ_PARSED → FINISHED）
    pub fn finish(mut self) -> Self {
        self.advance(PipelineStage::Finished);
        self
    }

    fn advance(&mut self, to: PipelineStage) {
        debug_assert_eq!(
            self.stage.next(),
            Some(to),
            "pipeline stages must advance one step at a time"
        );
        self.stage = to;
    }

    // ========== 只读访问 ==========

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn extracted_keywords(&self) -> &[String] {
        &self.extracted_keywords
    }

    pub fn analysis_report(&self) -> &str {
        &self.analysis_report
    }

    pub fn generated_quiz(&self) -> &[QuestionRecord] {
        &self.generated_quiz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entry_format_and_order() {
        let mut state = SessionState::new("s-1", "text");
        state.log(TraceStep::Orchestrator, "Workflow initialized.");
        state.log(TraceStep::ToolExecution, "Running keyword extraction...");
        state.log(TraceStep::Error, "Failed to parse Quiz Master output.");

        assert_eq!(
            state.logs(),
            &[
                "[ORCHESTRATOR]: Workflow initialized.",
                "[TOOL_EXECUTION]: Running keyword extraction...",
                "[ERROR]: Failed to parse Quiz Master output.",
            ]
        );
    }

    #[test]
    fn test_stages_advance_in_order() {
        let state = SessionState::new("s-2", "text");
        assert_eq!(state.stage(), PipelineStage::Init);

        let state = state.with_keywords(vec!["Oxygen".to_string()]);
        assert_eq!(state.stage(), PipelineStage::KeywordsExtracted);

        let state = state.with_analysis("summary".to_string());
        let state = state.with_quiz(vec![QuestionRecord::parse_failure("Invalid JSON", "raw")]);
        let state = state.finish();

        assert_eq!(state.stage(), PipelineStage::Finished);
        assert_eq!(state.extracted_keywords(), &["Oxygen"]);
        assert_eq!(state.analysis_report(), "summary");
        assert_eq!(state.generated_quiz().len(), 1);
        assert_eq!(state.source_text(), "text");
    }

    #[test]
    #[should_panic(expected = "one step at a time")]
    #[cfg(debug_assertions)]
    fn test_skipping_a_stage_panics_in_debug() {
        let state = SessionState::new("s-3", "text");
        let _ = state.with_analysis("too early".to_string());
    }

    #[test]
    fn test_stage_serializes_screaming_case() {
        let json = serde_json::to_string(&PipelineStage::KeywordsExtracted).unwrap();
        assert_eq!(json, "\"KEYWORDS_EXTRACTED\"");
        assert_eq!(PipelineStage::Finished.next(), None);
    }
}
