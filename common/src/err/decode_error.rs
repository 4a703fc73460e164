use std::fmt::Display;
use std::{fmt, io};
use std::string::FromUtf8Error;

#[derive(Debug)]
pub enum ReError {
    //////////////////////
    // Common
    //////////////////////
    /// A condition that must never occur. If it does, it's a bug.
    BUG(String),
    /// The parser had an error (recoverable)
    Error(String),

    //////////////////////
    // IDMS migration
    //////////////////////
    /// No `RECORD NAME` line found in a schema file. Fatal to that schema.
    RecordNameNotFound(String),
    /// A PIC literal didn't match any of the known forms.
    PicParseErr(String),
    /// No `SET ... MODE` header found in a set file.
    SetHeaderNotFound(String),
    /// Unknown set mode token (neither CHAIN nor INDEX).
    UnknownSetMode(String),

    //////////////////////
    // IO
    //////////////////////
    IoError(io::Error),
    FromUtf8Error(FromUtf8Error),

    ConfigFileParseErr(String),

    /// Blob store operation failed (download/upload/list).
    StorageErr(String),
}

impl Display for ReError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> fmt::Result {
        match self {
            ReError::BUG(s)
            | ReError::Error(s)
            | ReError::RecordNameNotFound(s)
            | ReError::PicParseErr(s)
            | ReError::SetHeaderNotFound(s)
            | ReError::UnknownSetMode(s)
            | ReError::ConfigFileParseErr(s)
            | ReError::StorageErr(s) => {
                write!(f, "{}", s)
            }
            ReError::IoError(err) => {
                write!(f, "{}", err)
            }
            ReError::FromUtf8Error(err) => {
                write!(f, "{}", err)
            }
        }
    }
}

impl std::error::Error for ReError {}

impl From<io::Error> for ReError {
    fn from(error: io::Error) -> Self {
        ReError::IoError(error)
    }
}

impl From<FromUtf8Error> for ReError {
    fn from(error: FromUtf8Error) -> Self {
        ReError::FromUtf8Error(error)
    }
}
