use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnswerBoxError>;

#[derive(Error, Debug)]
pub enum AnswerBoxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Empty query")]
    EmptyInput,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod commands;
pub mod config;
pub mod embeddings;
pub mod engine;
pub mod index;
pub mod store;
