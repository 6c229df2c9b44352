pub mod embedding_client;
pub mod llm_client;
pub mod mock;
pub mod seq2seq_client;

pub use embedding_client::{Embedder, OpenAiEmbedder};
pub use llm_client::{OpenAiCompletion, TextCompletion};
pub use seq2seq_client::{GenerationParams, HttpSeq2Seq, Seq2SeqBackend};
