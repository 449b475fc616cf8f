use lopdf::encryption::DecryptionError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The source path is empty or does not name an existing file.
    #[error("Input PDF file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),
    /// No password was supplied.
    #[error("Please enter the password.")]
    MissingPassword,
    /// No destination was supplied and none could be derived from the source.
    #[error("Please choose where to save the unlocked PDF.")]
    MissingDestination,
    /// The document's security handler rejected the password.
    #[error("Incorrect password.")]
    IncorrectPassword,
    /// Any other failure while opening, parsing or writing, with the underlying message.
    #[error("{0}")]
    OperationFailed(String),
}

impl Error {
    /// Whether the operator can fix this by supplying a different password.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::IncorrectPassword | Error::MissingPassword)
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::InvalidPassword | lopdf::Error::Decryption(DecryptionError::IncorrectPassword) => {
                Error::IncorrectPassword
            }
            other => {
                // Some lopdf variants render as an empty string.
                let message = other.to_string();
                if message.is_empty() {
                    Error::OperationFailed(format!("{:?}", other))
                } else {
                    Error::OperationFailed(message)
                }
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::OperationFailed(err.to_string())
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::OperationFailed(err.error.to_string())
    }
}
