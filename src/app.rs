//! 应用上下文
//!
//! 三个后端在进程启动时构建一次，之后所有请求共享（只读）。
//! 每次请求各自拥有自己的 `SessionState`，因此这里不需要任何锁。

use std::sync::Arc;

use crate::clients::{
    Embedder, HttpSeq2Seq, OpenAiCompletion, OpenAiEmbedder, Seq2SeqBackend, TextCompletion,
};
use crate::config::Config;
use crate::services::{AnswerEvaluator, QuestionGenerator};
use crate::utils::logging;
use crate::workflow::Orchestrator;

/// 应用主结构
pub struct App {
    config: Config,
    orchestrator: Orchestrator,
    evaluator: AnswerEvaluator,
    generator: QuestionGenerator,
}

impl App {
    /// 按配置构建真实后端
    pub fn initialize(config: Config) -> Self {
        logging::log_startup(&config);
        config.warn_if_incomplete();

        let completion: Arc<dyn TextCompletion> = Arc::new(OpenAiCompletion::new(&config));
        let embedder: Arc<dyn Embedder> = Arc::new(OpenAiEmbedder::new(&config));
        let seq2seq: Arc<dyn Seq2SeqBackend> = Arc::new(HttpSeq2Seq::new(&config));

        Self::with_backends(config, completion, embedder, seq2seq)
    }

    /// 注入任意后端（测试中使用 mock）
    pub fn with_backends(
        config: Config,
        completion: Arc<dyn TextCompletion>,
        embedder: Arc<dyn Embedder>,
        seq2seq: Arc<dyn Seq2SeqBackend>,
    ) -> Self {
        Self {
            config,
            orchestrator: Orchestrator::new(completion),
            evaluator: AnswerEvaluator::new(embedder),
            generator: QuestionGenerator::new(seq2seq),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn evaluator(&self) -> &AnswerEvaluator {
        &self.evaluator
    }

    pub fn generator(&self) -> &QuestionGenerator {
        &self.generator
    }
}
