//! Main Crate Error

use std::path::PathBuf;

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::error;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Models(#[from] jobsight_models::error::Error),

    #[error(transparent)]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Task(#[from] tokio::task::JoinError),

    #[error("Help page for '{name}' could not be loaded from {}: {source}", path.display())]
    HelpPage {
        name: String,
        path: PathBuf,
        source: std::io::Error,
    },

    /* Api Errors */
    #[error("No {0} provided.")]
    MissingParameter(&'static str),

    #[error("{0}")]
    NotFound(String),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Models(_) | Error::Template(_) | Error::Task(_) | Error::HelpPage { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the client. Server side failures are logged
    /// and replaced by a generic message.
    pub fn public_message(&self) -> String {
        if self.status().is_server_error() {
            error!("Creating API error response for error: {:?}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = Json(json!({
            "error": {
                "message": self.public_message(),
                "status": status.as_u16()
            }
        }));
        (status, body).into_response()
    }
}
