pub mod quiz;
pub mod session;

pub use quiz::{QuestionRecord, QuizQuestion};
pub use session::{PipelineStage, SessionState, TraceStep};
