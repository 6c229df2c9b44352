//! 生成式 Agent - 业务能力层
//!
//! 只有一种 Agent 类型，行为差异完全由不可变的 `Persona` 决定。
//! 后端失败不会向上抛出，而是转换成一段错误文本，让流水线继续执行并在日志中留下痕迹。

use std::sync::Arc;

use tracing::{debug, warn};

use crate::clients::TextCompletion;
use crate::utils::truncate_text;

/// Agent 的身份与角色说明
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub name: &'static str,
    pub role: &'static str,
}

impl Persona {
    /// 分析师：总结原文、提炼学习要点
    pub const fn analyst() -> Self {
        Self {
            name: "Analyst",
            role: "You are an Educational Content Analyst. \
                   Your job is to summarize text and identify key learning objectives \
                   based on specific keywords provided to you.",
        }
    }

    /// 出题人：只输出 JSON，只依据提供的分析出题
    pub const fn quiz_master() -> Self {
        Self {
            name: "QuizMaster",
            role: "You are a Strict Quiz Generator. \
                   You output ONLY valid JSON. \
                   You generate questions based ONLY on the provided analysis, not external knowledge.",
        }
    }
}

/// Agent 的一次回复
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentReply {
    /// 后端正常返回（已去除首尾空白）
    Text(String),
    /// 后端失败，内容为面向下游的错误文本
    BackendError(String),
}

impl AgentReply {
    /// 回复文本；后端失败时为错误描述
    pub fn text(&self) -> &str {
        match self {
            AgentReply::Text(text) | AgentReply::BackendError(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            AgentReply::Text(text) | AgentReply::BackendError(text) => text,
        }
    }

    pub fn is_backend_error(&self) -> bool {
        matches!(self, AgentReply::BackendError(_))
    }
}

/// 生成式 Agent
pub struct GenerativeAgent {
    persona: Persona,
    backend: Arc<dyn TextCompletion>,
}

impl GenerativeAgent {
    pub fn new(persona: Persona, backend: Arc<dyn TextCompletion>) -> Self {
        Self { persona, backend }
    }

    pub fn analyst(backend: Arc<dyn TextCompletion>) -> Self {
        Self::new(Persona::analyst(), backend)
    }

    pub fn quiz_master(backend: Arc<dyn TextCompletion>) -> Self {
        Self::new(Persona::quiz_master(), backend)
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// 组装 prompt：身份 → 上下文 → 任务，顺序固定
    pub fn compose_prompt(&self, prompt: &str, context: Option<&str>) -> String {
        format!(
            "Role: {}\nContext Data: {}\nTask: {}",
            self.persona.role,
            context.unwrap_or("None"),
            prompt
        )
    }

    /// 调用后端生成文本
    pub async fn generate(&self, prompt: &str, context: Option<&str>) -> AgentReply {
        let full_prompt = self.compose_prompt(prompt, context);
        debug!(
            "[{}] 调用模型 {}: {}",
            self.persona.name,
            self.backend.model_name(),
            truncate_text(prompt, 80)
        );

        match self.backend.complete(&full_prompt).await {
            Ok(text) => AgentReply::Text(text.trim().to_string()),
            Err(e) => {
                warn!("[{}] ⚠️ 生成失败: {}", self.persona.name, e);
                AgentReply::BackendError(format!("Error generating content: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mock::ScriptedCompletion;

    #[tokio::test]
    async fn test_prompt_order_is_role_context_task() {
        let backend = Arc::new(ScriptedCompletion::replying(["  summary  "]));
        let agent = GenerativeAgent::analyst(backend.clone());

        let reply = agent.generate("Summarize.", Some("Plants make Oxygen.")).await;
        assert_eq!(reply, AgentReply::Text("summary".to_string()));

        let prompts = backend.prompts();
        assert_eq!(prompts.len(), 1);
        let prompt = &prompts[0];
        let role = prompt.find("Role: You are an Educational Content Analyst.").unwrap();
        let context = prompt.find("\nContext Data: Plants make Oxygen.").unwrap();
        let task = prompt.find("\nTask: Summarize.").unwrap();
        assert!(role < context && context < task);
    }

    #[tokio::test]
    async fn test_missing_context_renders_none() {
        let backend = Arc::new(ScriptedCompletion::replying(["ok"]));
        let agent = GenerativeAgent::quiz_master(backend.clone());

        agent.generate("Do it.", None).await;
        assert!(backend.prompts()[0].contains("\nContext Data: None\n"));
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_error_text() {
        let backend = Arc::new(ScriptedCompletion::new(vec![Err("quota exceeded".to_string())]));
        let agent = GenerativeAgent::quiz_master(backend);

        let reply = agent.generate("Make a quiz.", Some("ctx")).await;
        assert!(reply.is_backend_error());
        assert!(reply.text().starts_with("Error generating content: "));
        assert!(reply.text().contains("quota exceeded"));
    }

    #[test]
    fn test_personas_differ_only_by_role_text() {
        assert_eq!(Persona::analyst().name, "Analyst");
        assert_eq!(Persona::quiz_master().name, "QuizMaster");
        assert!(Persona::quiz_master().role.contains("ONLY valid JSON"));
        assert!(Persona::quiz_master().role.contains("not external knowledge"));
    }
}
