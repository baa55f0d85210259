use libsync::CapacityError;
use std::{error::Error as StdError, fmt::Display, io};

/// Errors reported by stage and pipeline operations.
#[derive(Debug)]
pub enum StageError {
    /// The stage's inbox could not be allocated
    Capacity(CapacityError),
    /// The worker thread could not be started
    Spawn(io::Error),
    /// Work was offered to a stage that has already stopped
    Finished(String),
    /// A second forward hook was attached to the same stage
    Attached(String),
    /// The worker panicked before it could be joined
    Panicked(String),
    /// A pipeline was assembled without any stages
    Empty,
}

impl Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageError::Capacity(e) => write!(f, "{e}"),
            StageError::Spawn(e) => write!(f, "failed to start a stage worker: {e}"),
            StageError::Finished(name) => {
                write!(f, "stage \"{name}\" is no longer accepting work")
            }
            StageError::Attached(name) => {
                write!(f, "stage \"{name}\" already has a forward hook")
            }
            StageError::Panicked(name) => {
                write!(f, "the worker for stage \"{name}\" panicked")
            }
            StageError::Empty => write!(f, "a pipeline requires at least one stage"),
        }
    }
}

impl From<CapacityError> for StageError {
    fn from(value: CapacityError) -> Self {
        Self::Capacity(value)
    }
}

impl From<io::Error> for StageError {
    fn from(value: io::Error) -> Self {
        Self::Spawn(value)
    }
}

impl StdError for StageError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StageError::Capacity(e) => Some(e),
            StageError::Spawn(e) => Some(e),
            _ => None,
        }
    }
}
