use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use serde_json::json;
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Sheet \"{0}\" not found in the workbook.")]
    SheetNotFound(String),
    #[error("The sheet is empty or could not be read.")]
    EmptySheet,
    #[error("Failed to open Excel file: {0}")]
    WorkbookRead(String),
    #[error("Failed to write Excel file: {0}")]
    WorkbookWrite(String),
    #[error("Failed to load FAQ catalog: {0}")]
    Catalog(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::WorkbookWrite(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::InvalidInput(format!("Malformed upload: {}", err.body_text()))
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::SheetNotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmptySheet => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::WorkbookRead(_) => StatusCode::BAD_REQUEST,
            AppError::WorkbookWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_user_facing_text() {
        assert_eq!(
            AppError::SheetNotFound("Roster".into()).to_string(),
            "Sheet \"Roster\" not found in the workbook."
        );
        assert_eq!(
            AppError::EmptySheet.to_string(),
            "The sheet is empty or could not be read."
        );
    }

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(AppError::EmptySheet.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            AppError::InvalidInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert!(AppError::Internal("x".into()).status().is_server_error());
    }
}
