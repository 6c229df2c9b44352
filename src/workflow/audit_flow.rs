//! 内容审计流程 - 流程层
//!
//! 核心职责：定义"一段文本"的完整处理流程
//!
//! 流程顺序（严格线性，无分支、无重试）：
//! 1. 关键词提取（确定性工具）
//! 2. Analyst 总结原文
//! 3. QuizMaster 只依据关键词 + 分析报告出题（看不到原文）
//! 4. 解析测验 JSON，失败时写入兜底记录
//!
//! 任何阶段的失败都只降级本阶段的输出，流程总会走到 FINISHED。

use std::sync::Arc;

use crate::clients::TextCompletion;
use crate::models::{SessionState, TraceStep};
use crate::services::{GenerativeAgent, KeywordExtractor};
use crate::utils::format_keywords;
use crate::workflow::quiz_parser::parse_quiz_records;

/// 编排器：持有两个 Agent，不持有任何会话状态
pub struct Orchestrator {
    analyst: GenerativeAgent,
    quiz_master: GenerativeAgent,
}

impl Orchestrator {
    /// 两个 Agent 共用同一个后端
    pub fn new(backend: Arc<dyn TextCompletion>) -> Self {
        Self {
            analyst: GenerativeAgent::analyst(backend.clone()),
            quiz_master: GenerativeAgent::quiz_master(backend),
        }
    }

    pub fn with_agents(analyst: GenerativeAgent, quiz_master: GenerativeAgent) -> Self {
        Self {
            analyst,
            quiz_master,
        }
    }

    /// 运行完整流程，返回填充完毕的会话状态
    pub async fn process_content(&self, session_id: &str, text_content: &str) -> SessionState {
        let mut state = SessionState::new(session_id, text_content);
        state.log(TraceStep::Orchestrator, "Workflow initialized.");

        let state = self.extract_keywords(state);
        let state = self.analyze(state).await;
        let mut state = self.compose_quiz(state).await;

        state.log(TraceStep::Orchestrator, "Workflow finished.");
        state.finish()
    }

    /// INIT → KEYWORDS_EXTRACTED
    fn extract_keywords(&self, mut state: SessionState) -> SessionState {
        state.log(TraceStep::ToolExecution, "Running keyword extraction...");
        let keywords = KeywordExtractor::extract_keywords(Some(state.source_text()));

        let mut state = state.with_keywords(keywords);
        let message = format!("Keywords found: {}", format_keywords(state.extracted_keywords()));
        state.log(TraceStep::ToolResult, message);
        state
    }

    /// KEYWORDS_EXTRACTED → ANALYSIS_DONE
    ///
    /// Analyst 拿到原文作为上下文；输出原样保存，不做校验
    async fn analyze(&self, mut state: SessionState) -> SessionState {
        state.log(TraceStep::Orchestrator, "Dispatching to Analyst Agent.");

        let prompt = analyst_prompt(state.extracted_keywords());
        let reply = self.analyst.generate(&prompt, Some(state.source_text())).await;

        if reply.is_backend_error() {
            state.log(
                TraceStep::Error,
                "Analyst backend failed; error text stored as analysis report.",
            );
        }
        let mut state = state.with_analysis(reply.into_text());
        state.log(TraceStep::AnalystOutput, "Analysis complete.");
        state
    }

    /// ANALYSIS_DONE → QUIZ_PARSED
    ///
    /// QuizMaster 只拿到关键词和分析报告，永远看不到原文
    async fn compose_quiz(&self, mut state: SessionState) -> SessionState {
        state.log(TraceStep::Orchestrator, "Dispatching to Quiz Master Agent.");

        let context = quiz_context(state.extracted_keywords(), state.analysis_report());
        let reply = self.quiz_master.generate(QUIZ_PROMPT, Some(&context)).await;

        if reply.is_backend_error() {
            state.log(TraceStep::Error, "Quiz Master backend failed.");
        }

        let (records, parse_error) = parse_quiz_records(reply.text());
        match parse_error {
            None => state.log(TraceStep::QuizMaster, "JSON parsed successfully."),
            Some(e) => {
                tracing::debug!("测验解析失败原因: {}", e);
                state.log(TraceStep::Error, "Failed to parse Quiz Master output.");
            }
        }

        state.with_quiz(records)
    }
}

const QUIZ_PROMPT: &str = "Create 3 multiple-choice questions based on the provided Analysis Report. \
    Return output as a JSON list of objects with keys: 'question', 'options' (list), 'answer'. \
    The 'answer' must be copied exactly from one of the 'options'. \
    Do not use Markdown formatting like ```json.";

fn analyst_prompt(keywords: &[String]) -> String {
    format!(
        "Analyze the source text. Focus specifically on these identified keywords: {}. \
         Provide a summary and 3 key learning points.",
        format_keywords(keywords)
    )
}

fn quiz_context(keywords: &[String], analysis: &str) -> String {
    format!("Keywords: {}\nAnalysis: {}", format_keywords(keywords), analysis)
}
