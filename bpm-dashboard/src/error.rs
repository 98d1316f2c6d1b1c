use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures the data service reports to its callers.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A raw data file (or route) does not exist.
    #[error("not found")]
    NotFound,

    /// The user data file could not be read for searching.
    #[error("data file not found")]
    DataFileNotFound(#[source] std::io::Error),

    /// The stored data is not something the search can work with.
    #[error("internal server error")]
    InvalidJson(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound | ServiceError::DataFileNotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidJson(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// Failures of a dashboard data fetch.
///
/// `Display` is the exact text shown in the error banner.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{code} {reason}")]
    Status { code: u16, reason: String },

    #[error("Expected application/json but got {0}")]
    UnexpectedContentType(String),

    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid base URL '{url}': {reason}")]
    Url { url: String, reason: String },
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = hyper::body::to_bytes(resp.into_body())
            .await
            .expect("bytes");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn service_errors_map_to_status_and_body() {
        let resp = ServiceError::NotFound.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await, json!({ "error": "not found" }));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let resp = ServiceError::DataFileNotFound(io).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await, json!({ "error": "data file not found" }));

        let resp = ServiceError::InvalidJson("EOF".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await, json!({ "error": "internal server error" }));
    }

    #[test]
    fn client_error_messages_match_banner_text() {
        let e = ClientError::Status {
            code: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(e.to_string(), "404 Not Found");

        let e = ClientError::UnexpectedContentType("text/html".into());
        assert_eq!(e.to_string(), "Expected application/json but got text/html");
    }
}
