//! Prompt-keyed response caches for the language-model synonym oracle.

/// Storage-related errors
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// A stored value is not valid UTF-8
    #[error("Corrupt cache entry for prompt: {prompt}")]
    Corrupt { prompt: String },
}

pub mod cache;

pub use cache::{MemoryCache, ResponseCache, SledCache};
