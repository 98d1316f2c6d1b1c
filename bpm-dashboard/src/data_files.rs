use crate::error::ServiceError;
use crate::state::{AppState, DATA_ALL_FILE, DATA_USERS_FILE};
use axum::{
    body::StreamBody,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::Path;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

/// Stream a data file to the client byte-for-byte.
///
/// The content is never parsed: a malformed file goes out exactly as stored.
async fn stream_json_file(path: &Path) -> Result<Response, ServiceError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            warn!("'{}' is not a regular file", path.display());
            return Err(ServiceError::NotFound);
        }
        Err(e) => {
            warn!("Cannot stat '{}': {}", path.display(), e);
            return Err(ServiceError::NotFound);
        }
    }

    let file = tokio::fs::File::open(path).await.map_err(|e| {
        warn!("Cannot open '{}': {}", path.display(), e);
        ServiceError::NotFound
    })?;
    debug!("Streaming '{}'", path.display());

    // Stream the file directly to the client to keep memory usage low
    let body = StreamBody::new(ReaderStream::new(file));
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

pub async fn data_all_handler(State(state): State<Arc<AppState>>) -> Result<Response, ServiceError> {
    stream_json_file(&state.data_file(DATA_ALL_FILE)).await
}

pub async fn data_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServiceError> {
    debug!("/data-users requested");
    stream_json_file(&state.data_file(DATA_USERS_FILE)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HealthStatus;
    use crate::pipeline_health::FixedHealthProbe;

    fn state_for(dir: &Path) -> Arc<AppState> {
        Arc::new(AppState::with_probe(
            dir,
            Arc::new(FixedHealthProbe(HealthStatus::Passing)),
        ))
    }

    async fn body_bytes(resp: Response) -> bytes::Bytes {
        hyper::body::to_bytes(resp.into_body())
            .await
            .expect("bytes")
    }

    #[tokio::test]
    async fn streams_file_verbatim_as_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let content = "{ \"high_bpm\": 150,\n  \"low_bpm\": 50 }\n";
        std::fs::write(dir.path().join(DATA_ALL_FILE), content).expect("write");

        let resp = data_all_handler(State(state_for(dir.path())))
            .await
            .expect("resp");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_bytes(resp).await, content.as_bytes());
    }

    #[tokio::test]
    async fn malformed_users_file_is_still_streamed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let content = "[{\"id\": 1, \"name\": ";
        std::fs::write(dir.path().join(DATA_USERS_FILE), content).expect("write");

        let resp = data_users_handler(State(state_for(dir.path())))
            .await
            .expect("resp");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await, content.as_bytes());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = data_users_handler(State(state_for(dir.path()))).await;
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn directory_is_not_a_regular_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join(DATA_ALL_FILE)).expect("mkdir");
        let result = data_all_handler(State(state_for(dir.path()))).await;
        let err = result.expect_err("directory should be rejected");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "not found");
    }
}
