use axum::http::StatusCode;
use thiserror::Error;
use tracing::error;

pub type AppResult<T> = std::result::Result<T, AppError>;

/// Failures surfaced by services to the HTTP layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// An operation was attempted before its inputs exist (e.g. no goals yet).
    #[error("{0}")]
    Precondition(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Precondition(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(e.into())
    }
}

impl From<AppError> for (StatusCode, String) {
    fn from(e: AppError) -> Self {
        let status = e.status();
        if let AppError::Internal(inner) = &e {
            error!(error = ?inner, "internal error");
            return (status, "Internal server error".to_string());
        }
        (status, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        let cases = [
            (AppError::validation("bad"), StatusCode::BAD_REQUEST),
            (AppError::Precondition("no goals".into()), StatusCode::BAD_REQUEST),
            (AppError::not_found("missing"), StatusCode::NOT_FOUND),
            (AppError::Forbidden("nope".into()), StatusCode::FORBIDDEN),
            (AppError::Conflict("taken".into()), StatusCode::CONFLICT),
            (AppError::Unauthorized("who".into()), StatusCode::UNAUTHORIZED),
            (
                AppError::Internal(anyhow::anyhow!("db down")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let (status, _) = <(StatusCode, String)>::from(err);
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn keeps_message_in_response_body() {
        let (_, body) = <(StatusCode, String)>::from(AppError::not_found("Step not found"));
        assert_eq!(body, "Step not found");
    }

    #[test]
    fn hides_internal_details() {
        let (_, body) = <(StatusCode, String)>::from(AppError::Internal(anyhow::anyhow!(
            "relation \"roadmaps\" does not exist"
        )));
        assert_eq!(body, "Internal server error");
    }
}
