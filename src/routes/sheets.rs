use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, HeaderName, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use bytes::Bytes;
use std::sync::Arc;
use crate::{
    AppState,
    error::AppError,
    services::file_processor::{self, CleanOptions},
};
use tower_http::cors::{CorsLayer, Any};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const CLEANED_ROWS_HEADER: &str = "x-cleaned-rows";

pub fn routes(max_file_size: usize) -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION, HeaderName::from_static(CLEANED_ROWS_HEADER)])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/sheets/clean", post(clean_sheet))
        .layer(DefaultBodyLimit::max(max_file_size))
        .layer(cors)
}

#[axum::debug_handler]
async fn clean_sheet(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let start = std::time::Instant::now();
    let mut upload: Option<Bytes> = None;
    let mut options = CleanOptions::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                tracing::info!("Receiving upload {:?}", field.file_name());
                upload = Some(field.bytes().await?);
            }
            Some("sheet_name") => options.sheet_name = Some(field.text().await?),
            Some("output_name") => options.output_name = Some(field.text().await?),
            other => tracing::debug!("Ignoring multipart field {:?}", other),
        }
    }

    let resolved = options.resolve(
        &state.config.default_sheet_name,
        &state.config.default_output_name,
    );
    let export = file_processor::clean_export(upload, resolved).await?;
    tracing::info!(
        "Served {} ({} rows) in {:?}",
        export.file_name,
        export.row_count,
        start.elapsed()
    );

    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe_file_name(&export.file_name)
    );
    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
        (
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition)
                .map_err(|e| AppError::Internal(format!("invalid file name header: {}", e)))?,
        ),
        (
            HeaderName::from_static(CLEANED_ROWS_HEADER),
            HeaderValue::from(export.row_count),
        ),
    ];

    Ok((headers, export.bytes).into_response())
}

/// Header values must be visible ASCII; quotes would end the filename early.
fn header_safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' { c } else { '_' })
        .collect()
}
