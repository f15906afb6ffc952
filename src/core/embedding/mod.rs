//! Text embedding providers used by the trope resolver.

pub mod hashing;
pub mod ollama;
pub mod provider;

pub use hashing::HashingEmbeddings;
pub use ollama::OllamaEmbeddings;
pub use provider::{create_provider, EmbeddingConfig, EmbeddingError, EmbeddingProvider, Result};
