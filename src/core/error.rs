use crate::remote::RemoteError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BagError {
    #[error("Item '{0}' not found in bag")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Mutation failed: {0}")]
    MutationFailed(#[from] RemoteError),
}

pub type Result<T> = std::result::Result<T, BagError>;

impl BagError {
    /// Local errors surface synchronously and never reach the network.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Validation(_))
    }
}
