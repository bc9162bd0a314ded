//! Common error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("USB error: {0}")]
    Usb(String),

    #[error("USB ID database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<usbids::DatabaseError> for Error {
    fn from(e: usbids::DatabaseError) -> Self {
        match e {
            usbids::DatabaseError::Io(io) => Error::Io(io),
            other => Error::Database(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
