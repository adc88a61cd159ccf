use thiserror::Error;

use crate::types::{MAX_INPUT_CHARS, MAX_TOKEN_BUDGET, MIN_TOKEN_BUDGET};

#[derive(Error, Debug)]
pub enum AgError {
    #[error("input text is empty")]
    EmptyInput,
    #[error("input text exceeds {MAX_INPUT_CHARS} characters (got {0})")]
    InputTooLong(usize),
    #[error("token budget {0} outside [{MIN_TOKEN_BUDGET}, {MAX_TOKEN_BUDGET}]")]
    BudgetOutOfRange(u32),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AgError>;
