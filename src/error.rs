use thiserror::Error;

use crate::client::ClientError;
use crate::errno::Errno;

/// Enum for provider errors
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Target path does not exist. Always surfaced distinctly, never retried.
    #[error("not found: {0}")]
    NotFound(String),
    /// Native failure translated to a POSIX code, tagged with the
    /// operation that failed
    #[error("{op}: {errno}")]
    Errno { op: &'static str, errno: Errno },
    /// Any other I/O failure, untranslated
    #[error("I/O: {0}")]
    IO(String),
}

impl Error {
    /// Shapes a client failure into the errno form, keeping not-found distinct.
    pub(crate) fn errno_shaped(op: &'static str, error: ClientError) -> Self {
        match error {
            ClientError::NotFound(path) => Self::NotFound(path),
            ClientError::Io(msg) => Self::Errno {
                op,
                errno: Errno::from_message(&msg),
            },
        }
    }
}

impl From<ClientError> for Error {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::NotFound(path) => Self::NotFound(path),
            ClientError::Io(msg) => Self::IO(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
