use std::fmt;
use std::fmt::Display;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::api::result::R;

/// Result returning Error
pub type WResult<T> = std::result::Result<T, WebError>;

/// errors. All except Internal are considered user-facing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WebError {
    /// Malformed or incomplete request body.
    BadRequest(String),
    /// Core migration pipeline failed.
    Migration(String),
    /// Serialization failure.
    Serialization(String),
}

impl std::error::Error for WebError {}

impl Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> fmt::Result {
        match self {
            WebError::BadRequest(s) => write!(f, "{}", s),
            WebError::Migration(s) => write!(f, "{}", s),
            WebError::Serialization(s) => write!(f, "{}", s),
        }
    }
}

impl From<serde_json::error::Error> for WebError {
    fn from(err: serde_json::error::Error) -> Self {
        WebError::Serialization(err.to_string())
    }
}

impl From<common::err::ReError> for WebError {
    fn from(err: common::err::ReError) -> Self {
        WebError::Migration(err.to_string())
    }
}

impl ResponseError for WebError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::Migration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(R::error(self.status_code().as_u16(), &self.to_string()))
    }
}
