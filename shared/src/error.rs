use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    SlotConflict(String),
    #[error("{0}")]
    InvalidTransition(String),
    #[error("{0}")]
    ForbiddenOperation(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("トランザクションを実行できませんでした。")]
    TransactionError(#[source] sqlx::Error),
    #[error("データベース処理実行中にエラーが発生しました。")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("No rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("{0}")]
    KeyValueStoreError(#[from] redis::RedisError),
    #[error("{0}")]
    ExternalServiceError(String),
    #[error("{0}")]
    ConversionEntityError(String),
    #[error("ログインが必要です。")]
    UnauthenticatedError,
    #[error("認可情報が誤っています。")]
    UnauthorizedError,
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match self {
            AppError::UnprocessableEntity(_) | AppError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::SlotConflict(_) => StatusCode::CONFLICT,
            AppError::InvalidTransition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ForbiddenOperation(_) => StatusCode::FORBIDDEN,
            AppError::UnauthenticatedError => StatusCode::UNAUTHORIZED,
            AppError::UnauthorizedError => StatusCode::FORBIDDEN,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::KeyValueStoreError(_)
            | AppError::ConversionEntityError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::error!(
            error.cause_chain = ?self,
            error.message = %self,
            "Error happened in request processing"
        );

        (status_code, self.to_string()).into_response()
    }
}
