//! Mock 后端（用于测试，无需 API）
//!
//! 按脚本返回结果并记录每次调用的输入，便于断言 prompt 内容和调用次数。

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::clients::{Embedder, GenerationParams, Seq2SeqBackend, TextCompletion};
use crate::error::{AppError, AppResult};

const MOCK_MODEL: &str = "mock";

/// 按顺序返回预设回复的文本补全后端；脚本用完后返回错误
#[derive(Debug, Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// 依次返回给定文本
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(replies.into_iter().map(|s| Ok(s.into())).collect())
    }

    /// 收到的全部 prompt（按调用顺序）
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextCompletion for ScriptedCompletion {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let next = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());

        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(AppError::llm(MOCK_MODEL, message)),
            None => Err(AppError::llm(MOCK_MODEL, "no scripted reply left")),
        }
    }

    fn model_name(&self) -> &str {
        MOCK_MODEL
    }
}

/// 查表返回向量的 Embedding 后端；未登记的文本返回错误
#[derive(Debug, Default)]
pub struct MockEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    calls: Mutex<usize>,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }

    /// 后端被调用的次数
    pub fn calls(&self) -> usize {
        self.calls.lock().map(|c| *c).unwrap_or_default()
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }
        texts
            .iter()
            .map(|text| {
                self.vectors
                    .get(text)
                    .cloned()
                    .ok_or_else(|| AppError::embedding(MOCK_MODEL, format!("unknown text: {}", text)))
            })
            .collect()
    }

    fn model_name(&self) -> &str {
        MOCK_MODEL
    }
}

/// 固定回复的 seq2seq 后端，记录收到的输入
#[derive(Debug)]
pub struct MockSeq2Seq {
    reply: Result<String, String>,
    inputs: Mutex<Vec<(String, GenerationParams)>>,
}

impl MockSeq2Seq {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn inputs(&self) -> Vec<(String, GenerationParams)> {
        self.inputs.lock().map(|i| i.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Seq2SeqBackend for MockSeq2Seq {
    async fn generate(&self, input: &str, params: &GenerationParams) -> AppResult<String> {
        if let Ok(mut inputs) = self.inputs.lock() {
            inputs.push((input.to_string(), *params));
        }
        self.reply
            .clone()
            .map_err(|message| AppError::generation(MOCK_MODEL, message))
    }

    fn model_name(&self) -> &str {
        MOCK_MODEL
    }
}
