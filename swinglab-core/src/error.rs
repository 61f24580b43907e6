//! Service-level error taxonomy.

use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum SwingError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ConfigError),

    #[error("upstream failure: {0}")]
    Upstream(#[from] StoreError),
}

impl SwingError {
    /// True when retrying the same call could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Upstream(StoreError::Unavailable(_) | StoreError::Io(_))
        )
    }
}
