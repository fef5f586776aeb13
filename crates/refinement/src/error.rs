//! Error types for the refinement loop

use barkeep_core::StrategyId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefinementError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No strategy registered for {0}")]
    StrategyUnavailable(StrategyId),

    #[error("No cocktails found after {rounds} rounds")]
    NoResults { rounds: usize },
}

impl From<RefinementError> for barkeep_core::Error {
    fn from(err: RefinementError) -> Self {
        match err {
            RefinementError::InvalidRequest(msg) => barkeep_core::Error::invalid_input(msg),
            other => barkeep_core::Error::Other(other.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RefinementError>;
