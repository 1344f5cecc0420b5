//! Error types shared by the repository and HTTP layers.

use axum::{
    Json,
    extract::rejection::{BytesRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("storage error: {0}")]
    Storage(#[source] sqlx::Error),

    #[error("invalid request body: {0}")]
    RequestFormat(String),

    /// An extractor refused the request (oversized body, bad query string).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn request_format(msg: impl Into<String>) -> Self {
        Error::RequestFormat(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::RequestFormat(_) => StatusCode::BAD_REQUEST,
            Error::Rejected { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Error::Connection(err),
            _ => Error::Storage(err),
        }
    }
}

impl From<BytesRejection> for Error {
    fn from(rejection: BytesRejection) -> Self {
        Error::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_are_connection_errors() {
        assert!(matches!(
            Error::from(sqlx::Error::PoolClosed),
            Error::Connection(_)
        ));
        assert!(matches!(
            Error::from(sqlx::Error::PoolTimedOut),
            Error::Connection(_)
        ));
    }

    #[test]
    fn query_errors_are_storage_errors() {
        assert!(matches!(
            Error::from(sqlx::Error::RowNotFound),
            Error::Storage(_)
        ));
    }

    #[test]
    fn request_format_maps_to_bad_request() {
        let response = Error::request_format("expected value").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_body_keeps_413_with_json_error() {
        use axum::{
            body::{Body, Bytes, to_bytes},
            extract::FromRequest,
            http::Request,
        };

        let request = Request::builder()
            .method("POST")
            .uri("/logs")
            .body(Body::from(vec![b'x'; 3 * 1024 * 1024]))
            .unwrap();
        let rejection = Bytes::from_request(request, &()).await.unwrap_err();

        let response = Error::from(rejection).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(v["error"].is_string());
    }

    #[test]
    fn storage_maps_to_internal_error() {
        let response = Error::from(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
