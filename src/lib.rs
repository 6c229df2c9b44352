//! # Quiz Forge
//!
//! 把一段原文变成测验：提取关键词 → 总结 → 生成选择题，并用语义相似度给学生答案打分
//!
//! ## 架构设计
//!
//! ### ① 后端层（Clients）
//! - `clients/` - 外部能力的 trait 与实现，进程内只构建一次
//! - `TextCompletion` - 文本生成（async-openai）
//! - `Embedder` - 文本向量化（async-openai embeddings）
//! - `Seq2SeqBackend` - 问题生成（HTTP 推理端点）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，互不依赖
//! - `KeywordExtractor` - 确定性关键词提取
//! - `GenerativeAgent` - 按 `Persona` 区分的生成式 Agent（Analyst / QuizMaster）
//! - `AnswerEvaluator` - 答案语义评分
//! - `QuestionGenerator` - 从上下文生成单个问题
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一段文本"的完整审计流程
//! - `Orchestrator` - 关键词 → 分析 → 出题 → 解析，状态按所有权逐段传递
//! - `quiz_parser` - 不可信 JSON 输出的解析与兜底
//!
//! ### ④ 边界层（Api）
//! - `api/` - `audit` / `generate` / `evaluate` 请求处理与输入校验
//!
//! ## 模块结构

pub mod api;
pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{PipelineStage, QuestionRecord, QuizQuestion, SessionState};
pub use services::{AnswerEvaluator, GenerativeAgent, KeywordExtractor, Persona, QuestionGenerator};
pub use workflow::Orchestrator;
