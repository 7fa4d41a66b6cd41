use amuzz_core::GatewayError;
use thiserror::Error;

/// Errors that can occur while reconciling playlist counts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Reconciler is detached")]
    Detached,

    #[error("Unknown playlist: {0}")]
    UnknownPlaylist(String),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
