//! Error taxonomy
//!
//! Setup and output problems are fatal and carry the offending path.
//! Decoding has no error path at all: garbage input just renders short.

use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed command line or session parameters
    #[error("usage: {0}")]
    Usage(String),

    /// Input or palette file could not be opened
    #[error("{}: {source}", path.display())]
    NoInput { path: PathBuf, source: io::Error },

    /// Read or write failure on an already opened file
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    /// Output file could not be created
    #[error("{}: {source}", path.display())]
    CantCreate { path: PathBuf, source: io::Error },

    /// PNG encoding failed; always a size bug on our side
    #[error("encode: {0}")]
    Encode(String),

    /// Session file is not valid JSON for a parameter set
    #[error("session: {0}")]
    Session(String),

    /// SDL reports its failures as plain strings
    #[error("display: {0}")]
    Display(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// sysexits(3) status for this error
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::Usage(_) | Self::Session(_) => 64,
            Self::NoInput { .. } => 66,
            Self::Encode(_) => 70,
            Self::Display(_) => 71,
            Self::CantCreate { .. } => 73,
            Self::Io { .. } => 74,
        }
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Self::Display(message)
    }
}
