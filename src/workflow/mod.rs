pub mod audit_flow;
pub mod quiz_parser;

pub use audit_flow::Orchestrator;
pub use quiz_parser::{parse_quiz, parse_quiz_records, strip_code_fences, QuizParseError};
