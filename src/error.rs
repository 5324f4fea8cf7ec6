use thiserror::Error;

/// The result of a network operation.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Error returned when a network operation failed.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum NetworkError {
    /// The number of fanins does not match the number of variables of the function.
    #[error("expected {expected} fanins, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// The network has reached an invalid state. Only reported by
    /// [`Network::check_integrity`][crate::network::Network::check_integrity].
    #[error("the network has reached an invalid state: {0}")]
    InvalidState(String),
}
