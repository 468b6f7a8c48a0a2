//! Error responses for the HTTP API

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rota_core::Error;
use serde::Serialize;

pub const NOT_FOUND: &str = "NOT_FOUND";
pub const PR_EXISTS: &str = "PR_EXISTS";
pub const PR_MERGED: &str = "PR_MERGED";
pub const NOT_ASSIGNED: &str = "NOT_ASSIGNED";
pub const NO_CANDIDATE: &str = "NO_CANDIDATE";
pub const INVALID_INPUT: &str = "INVALID_INPUT";
pub const CANCELLED: &str = "CANCELLED";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// An error rendered as `{"error": {"code", "message"}}`
#[derive(Debug)]
pub struct ApiErr {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiErr {
    /// 400 for a malformed or incomplete request
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: INVALID_INPUT,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: ErrorBody {
                    code: self.code,
                    message: self.message,
                },
            }),
        )
            .into_response()
    }
}

impl From<Error> for ApiErr {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::PrNotFound(_)
            | Error::UserNotFound(_)
            | Error::AuthorNotFound(_)
            | Error::TeamNotFound(_) => (StatusCode::NOT_FOUND, NOT_FOUND),
            Error::PrAlreadyExists(_) => (StatusCode::CONFLICT, PR_EXISTS),
            Error::ReassigningMergedPr(_) => (StatusCode::CONFLICT, PR_MERGED),
            Error::UserNotAssignedToPr { .. } => (StatusCode::CONFLICT, NOT_ASSIGNED),
            Error::NoActiveCandidates(_) => (StatusCode::CONFLICT, NO_CANDIDATE),
            Error::Cancelled | Error::DeadlineExceeded(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, CANCELLED)
            }
            Error::Consistency(_) | Error::Storage(_) | Error::Config(_) | Error::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
            }
        };

        // Storage details stay in the logs
        let message = if err.is_internal() {
            "internal server error".to_string()
        } else {
            err.to_string()
        };

        Self {
            status,
            code,
            message,
        }
    }
}

impl From<JsonRejection> for ApiErr {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_input(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiErr {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid_input(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_codes() {
        let cases = [
            (Error::PrNotFound("pr-1".into()), StatusCode::NOT_FOUND, NOT_FOUND),
            (Error::AuthorNotFound("u1".into()), StatusCode::NOT_FOUND, NOT_FOUND),
            (Error::PrAlreadyExists("pr-1".into()), StatusCode::CONFLICT, PR_EXISTS),
            (Error::ReassigningMergedPr("pr-1".into()), StatusCode::CONFLICT, PR_MERGED),
            (
                Error::UserNotAssignedToPr {
                    pr_id: "pr-1".into(),
                    user_id: "u9".into(),
                },
                StatusCode::CONFLICT,
                NOT_ASSIGNED,
            ),
            (Error::NoActiveCandidates("backend".into()), StatusCode::CONFLICT, NO_CANDIDATE),
            (Error::Cancelled, StatusCode::SERVICE_UNAVAILABLE, CANCELLED),
        ];

        for (err, status, code) in cases {
            let message = err.to_string();
            let api = ApiErr::from(err);
            assert_eq!(api.status, status);
            assert_eq!(api.code, code);
            assert_eq!(api.message, message);
        }
    }

    #[test]
    fn test_internal_errors_are_opaque() {
        let api = ApiErr::from(Error::Consistency("insert affected 0 rows".into()));
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.code, INTERNAL_ERROR);
        assert_eq!(api.message, "internal server error");

        let api = ApiErr::from(Error::storage(std::io::Error::other("disk I/O error")));
        assert_eq!(api.message, "internal server error");
    }
}
