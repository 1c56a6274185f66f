use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lifeblood_api::ApiError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Json Rejection Error: {0}")]
    AxumJsonRejection(#[from] JsonRejection),

    #[error("Query Rejection Error: {0}")]
    AxumQueryRejection(#[from] QueryRejection),

    #[error("Path Rejection Error: {0}")]
    AxumPathRejection(#[from] PathRejection),

    #[error("Database Error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Identity service Error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Io Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("No caller identity could be resolved")]
    Unauthenticated,
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Error".to_string(),
    )
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::Api(ApiError::DuplicateSubmission(existing)) => {
                let message = format!(
                    "This inspection was already submitted as record {} by {} at {}",
                    existing.id, existing.user_email, existing.submission_time
                );
                let body = json!({ "error": message, "duplicate": existing });
                return (StatusCode::CONFLICT, Json(body)).into_response();
            }
            Error::Api(ApiError::ValidationError(message)) => (StatusCode::BAD_REQUEST, message),
            Error::Api(ApiError::NotFound(what)) => (StatusCode::NOT_FOUND, format!("Not Found: {what}")),
            Error::Api(ApiError::ConcurrentUpdate(id)) => (
                StatusCode::CONFLICT,
                format!("Record {id} was changed by someone else, reload it and try again"),
            ),
            Error::Api(ApiError::WriteFailure(reason)) => {
                error!("Write Error:{:#?}", reason);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("The inspection could not be saved: {reason}"),
                )
            }
            Error::Api(ApiError::Unauthenticated) | Error::Unauthenticated => {
                warn!("Request without a resolvable identity");
                (
                    StatusCode::UNAUTHORIZED,
                    "Could not determine who you are".to_string(),
                )
            }
            Error::Api(error) => {
                error!("Api Error:{:#?}", error);
                internal()
            }
            Error::AxumJsonRejection(error) => {
                warn!("Axum Json Rejection Error:{:#?}", error);
                (StatusCode::BAD_REQUEST, error.body_text())
            }
            Error::AxumQueryRejection(error) => (StatusCode::BAD_REQUEST, error.body_text()),
            Error::AxumPathRejection(error) => (StatusCode::BAD_REQUEST, error.body_text()),
            Error::SqlxError(error) => {
                error!("Sqlx Error:{:#?}", error);
                internal()
            }
            Error::ReqwestError(error) => {
                error!("Reqwest Error:{:#?}", error);
                internal()
            }
            Error::IoError(error) => {
                error!("Io Error:{:#?}", error);
                internal()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::Api(ApiError::ValidationError("x".into())), StatusCode::BAD_REQUEST),
            (Error::Api(ApiError::NotFound("x".into())), StatusCode::NOT_FOUND),
            (Error::Api(ApiError::ConcurrentUpdate(1)), StatusCode::CONFLICT),
            (Error::Api(ApiError::WriteFailure("x".into())), StatusCode::INTERNAL_SERVER_ERROR),
            (
                Error::Api(ApiError::DiffInputMismatch { original: 1, updated: 2 }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (Error::Unauthenticated, StatusCode::UNAUTHORIZED),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
