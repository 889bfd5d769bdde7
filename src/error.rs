//! Error enum
use std::fmt;

use reqwest::StatusCode;

/// Errors raised while fetching the source.
#[derive(Debug)]
pub enum TransferError {
    /// Connection, timeout or body read failure.
    Reqwest(reqwest::Error),
    /// The server answered with a non-success status.
    Status { url: String, status: StatusCode },
    /// Source could not be opened, or its byte stream failed mid-read.
    Read(std::io::Error),
}

/// Errors raised while decoding records.
///
/// `line` is the 1-based line number for JSON Lines,
/// and the 1-based element index for JSON arrays.
#[derive(Debug)]
pub enum DecodeError {
    Syntax {
        line: usize,
        source: serde_json::Error,
    },
    NotAnObject {
        line: usize,
    },
}

impl DecodeError {
    pub fn line(&self) -> usize {
        match self {
            DecodeError::Syntax { line, .. } | DecodeError::NotAnObject { line } => *line,
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Transfer(TransferError),
    Decode(DecodeError),
    Write(std::io::Error),
    Custom(String),
}

impl Error {
    /// Process exit status for this error, never 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Custom(_) => 1,
            Error::Transfer(_) => 2,
            Error::Decode(_) => 3,
            Error::Write(_) => 4,
        }
    }
}

impl From<TransferError> for Error {
    fn from(e: TransferError) -> Error {
        Error::Transfer(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Transfer(TransferError::Reqwest(e))
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Error {
        Error::Decode(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::Reqwest(e) => write!(f, "request failed: {}", e),
            TransferError::Status { url, status } => write!(f, "{} answered {}", url, status),
            TransferError::Read(e) => write!(f, "could not read source: {}", e),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Syntax { line, source } => {
                write!(f, "malformed JSON at record {}: {}", line, source)
            }
            DecodeError::NotAnObject { line } => {
                write!(f, "record {} is not a JSON object", line)
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transfer(e) => write!(f, "transfer error: {}", e),
            Error::Decode(e) => write!(f, "decode error: {}", e),
            Error::Write(e) => write!(f, "write error: {}", e),
            Error::Custom(s) => f.write_str(s),
        }
    }
}

impl std::error::Error for Error {}
