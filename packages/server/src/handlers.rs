//! HTTP handler functions for the address standardization API.

use std::path::Path;

use actix_files::NamedFile;
use actix_multipart::{Multipart, MultipartError};
use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, web};
use addrstd_server_models::{ApiHealth, ApiUploadResponse};
use addrstd_table::{TableError, TableFormat, enrich_table, write_table_file};
use futures::TryStreamExt;

use crate::AppState;

/// Prefix of every generated file. Downloads are limited to these.
const OUTPUT_PREFIX: &str = "updated_";

/// Multipart field carrying the uploaded table.
const FILE_FIELD: &str = "file";

#[derive(Debug, thiserror::Error)]
enum UploadError {
    #[error("No file part")]
    NoFilePart,
    #[error("No selected file")]
    NoSelectedFile,
    #[error("Invalid file type")]
    InvalidFileType,
    #[error("File exceeds the {0} byte upload limit")]
    TooLarge(usize),
    #[error("Malformed upload: {0}")]
    Malformed(String),
    #[error(transparent)]
    Table(#[from] TableError),
}

impl From<MultipartError> for UploadError {
    fn from(e: MultipartError) -> Self {
        Self::Malformed(e.to_string())
    }
}

impl UploadError {
    fn into_response(self) -> HttpResponse {
        let message = match &self {
            Self::TooLarge(_) => {
                log::warn!("Rejected upload: {self}");
                return HttpResponse::PayloadTooLarge()
                    .json(serde_json::json!({ "error": self.to_string() }));
            }
            Self::NoFilePart | Self::NoSelectedFile | Self::InvalidFileType | Self::Malformed(_) => {
                self.to_string()
            }
            Self::Table(TableError::MissingAddressColumn { .. }) => {
                "No column named \"Address\" or \"Addresses\" found in the file".to_string()
            }
            Self::Table(
                TableError::UnsupportedFormat(_)
                | TableError::EmptyInput
                | TableError::Zip(_)
                | TableError::Xml(_)
                | TableError::Spreadsheet(_),
            ) => self.to_string(),
            Self::Table(e) => {
                log::error!("Failed to process upload: {e}");
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": e.to_string(),
                }));
            }
        };
        log::warn!("Rejected upload: {message}");
        HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
    }
}

/// Reduces a client-supplied file name to a safe base name: directory
/// parts are dropped, whitespace becomes `_`, and only ASCII
/// alphanumerics, `.`, `-`, and `_` are kept. Leading and trailing dots
/// and underscores are stripped. May return an empty string.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let kept: String = base
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                Some(c)
            } else {
                None
            }
        })
        .collect();
    kept.trim_matches(['.', '_']).to_string()
}

/// The `file` field of a multipart upload.
struct FilePart {
    filename: Option<String>,
    bytes: Vec<u8>,
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
}

/// Reads the `file` field, skipping any other fields.
async fn read_file_part(
    req: &HttpRequest,
    mut payload: Multipart,
    limit: usize,
) -> Result<FilePart, UploadError> {
    if !is_multipart(req) {
        return Err(UploadError::NoFilePart);
    }

    while let Some(mut field) = payload.try_next().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(ContentDisposition::get_filename)
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if bytes.len() + chunk.len() > limit {
                return Err(UploadError::TooLarge(limit));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(FilePart { filename, bytes });
    }

    Err(UploadError::NoFilePart)
}

fn process_upload(state: &AppState, part: &FilePart) -> Result<ApiUploadResponse, UploadError> {
    let filename = sanitize_filename(part.filename.as_deref().unwrap_or_default());
    if filename.is_empty() {
        return Err(UploadError::NoSelectedFile);
    }

    let path = Path::new(&filename);
    let format = match TableFormat::from_path(path) {
        Ok(format @ (TableFormat::Csv | TableFormat::Text | TableFormat::Xlsx)) => format,
        Ok(TableFormat::Xls) | Err(_) => return Err(UploadError::InvalidFileType),
    };

    let mut table = format.read(&part.bytes)?;
    let summary = enrich_table(&mut table, &state.options)?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    let id = uuid::Uuid::new_v4();
    let csv_filename = format!("{OUTPUT_PREFIX}{stem}_{id}.csv");
    let xlsx_filename = format!("{OUTPUT_PREFIX}{stem}_{id}.xlsx");
    write_table_file(
        &table,
        &state.config.upload_dir.join(&csv_filename),
        TableFormat::Csv,
    )?;
    write_table_file(
        &table,
        &state.config.upload_dir.join(&xlsx_filename),
        TableFormat::Xlsx,
    )?;

    log::info!(
        "Processed {filename}: {} of {} rows standardized -> {csv_filename}, {xlsx_filename}",
        summary.updated,
        summary.rows
    );

    Ok(ApiUploadResponse {
        success: true,
        csv_filename,
        xlsx_filename,
        rows: summary.rows,
        updated_rows: summary.updated,
    })
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/upload` (multipart form, field `file`)
///
/// Standardizes the uploaded CSV, text, or xlsx file and stores the
/// enriched table as both CSV and xlsx for download. Standardized rows are
/// filled green in the xlsx copy.
pub async fn upload(req: HttpRequest, state: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    let part = match read_file_part(&req, payload, state.config.max_upload_bytes).await {
        Ok(part) => part,
        Err(e) => return e.into_response(),
    };
    match web::block(move || process_upload(&state, &part)).await {
        Ok(Ok(response)) => HttpResponse::Ok().json(response),
        Ok(Err(e)) => e.into_response(),
        Err(e) => {
            log::error!("Upload worker failed: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string(),
            }))
        }
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "File not found" }))
}

/// `GET /api/download/{filename}`
///
/// Serves a previously generated file as an attachment.
pub async fn download(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let requested = path.into_inner();
    let filename = sanitize_filename(&requested);
    if filename != requested || !filename.starts_with(OUTPUT_PREFIX) {
        return not_found();
    }

    match NamedFile::open(state.config.upload_dir.join(&filename)) {
        Ok(file) => file
            .set_content_disposition(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(filename)],
            })
            .into_response(&req),
        Err(e) => {
            log::debug!("Download of {filename} failed: {e}");
            not_found()
        }
    }
}
