pub mod agent;
pub mod answer_evaluator;
pub mod keyword_extractor;
pub mod question_generator;

pub use agent::{AgentReply, GenerativeAgent, Persona};
pub use answer_evaluator::{AnswerEvaluator, Evaluation};
pub use keyword_extractor::KeywordExtractor;
pub use question_generator::{GeneratedQuestion, QuestionGenerator};
