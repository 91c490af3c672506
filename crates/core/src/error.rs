//! Core error types for MudProg

#[derive(thiserror::Error, Debug)]
pub enum MudError {
    #[error("Script error: {0}")]
    Script(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MudError>;
