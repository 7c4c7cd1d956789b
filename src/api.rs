//! Transport-facing call sites: health, preview, and transform.
//!
//! These functions carry no HTTP machinery of their own. They take the pieces
//! an upload handler has already collected (filename, bytes, raw `config`
//! payload) and return either a serializable body or an [`ApiError`] tagged
//! with the status code a server should answer with.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::{
    data::Table,
    engine::{RuleEngineResult, apply_business_rules},
    io_utils::{self, XLSX_MEDIA_TYPE},
    schema::{TransformStats, parse_options},
};

pub const PREVIEW_ROW_LIMIT: usize = 200;
pub const OUTPUT_FILENAME: &str = "finance-screening-output.xlsx";

pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_UNPROCESSABLE: u16 = 422;
pub const STATUS_INTERNAL: u16 = 500;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Unable to write output: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => STATUS_BAD_REQUEST,
            ApiError::Internal(_) => STATUS_INTERNAL,
        }
    }

    /// `{"detail": ...}` body for the error response.
    pub fn body(&self) -> JsonValue {
        serde_json::json!({ "detail": self.to_string() })
    }
}

/// An uploaded spreadsheet as received by the transport layer.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: Some(filename.into()),
            bytes,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, JsonValue>>,
    pub stats: TransformStats,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransformOutcome {
    File {
        filename: &'static str,
        content_type: &'static str,
        bytes: Vec<u8>,
    },
    Rejected {
        status: u16,
        issues: Vec<String>,
    },
}

impl TransformOutcome {
    /// `Content-Disposition` header value for a file outcome.
    pub fn content_disposition(&self) -> Option<String> {
        match self {
            TransformOutcome::File { filename, .. } => {
                Some(format!("attachment; filename=\"{filename}\""))
            }
            TransformOutcome::Rejected { .. } => None,
        }
    }
}

pub fn health() -> HealthResponse {
    HealthResponse { status: "ok" }
}

pub fn preview(upload: &Upload, config: Option<&str>) -> Result<PreviewResponse, ApiError> {
    let result = run(upload, config)?;
    preview_response(result, PREVIEW_ROW_LIMIT)
}

/// Shapes an engine result into the preview body, keeping at most `limit` rows.
pub fn preview_response(
    result: RuleEngineResult,
    limit: usize,
) -> Result<PreviewResponse, ApiError> {
    let shown = result.table.head(limit);
    Ok(PreviewResponse {
        columns: shown.columns().to_vec(),
        rows: rows_as_records(&shown)?,
        stats: result.stats,
        issues: result.issues,
    })
}

pub fn transform(upload: &Upload, config: Option<&str>) -> Result<TransformOutcome, ApiError> {
    let result = run(upload, config)?;
    if !result.is_success() {
        return Ok(TransformOutcome::Rejected {
            status: STATUS_UNPROCESSABLE,
            issues: result.issues,
        });
    }
    let bytes =
        io_utils::write_table(&result.table).map_err(|err| ApiError::Internal(format!("{err:#}")))?;
    Ok(TransformOutcome::File {
        filename: OUTPUT_FILENAME,
        content_type: XLSX_MEDIA_TYPE,
        bytes,
    })
}

fn validate_upload(upload: &Upload) -> Result<&str, ApiError> {
    let filename = upload
        .filename
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::BadRequest("File name is required.".to_string()))?;
    if !io_utils::is_spreadsheet_name(filename) {
        return Err(ApiError::BadRequest(
            "Only .xls or .xlsx files are allowed.".to_string(),
        ));
    }
    Ok(filename)
}

fn run(upload: &Upload, config: Option<&str>) -> Result<RuleEngineResult, ApiError> {
    let filename = validate_upload(upload)?;
    let options = parse_options(config).map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let table = io_utils::read_table(&upload.bytes, Some(filename))
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    Ok(apply_business_rules(&table, &options))
}

/// One JSON object per row, keyed by column in column order; empty cells are `null`.
pub fn rows_as_records(table: &Table) -> Result<Vec<Map<String, JsonValue>>, ApiError> {
    table
        .rows()
        .iter()
        .map(|row| {
            table
                .columns()
                .iter()
                .zip(row)
                .map(|(column, cell)| {
                    serde_json::to_value(cell)
                        .map(|value| (column.clone(), value))
                        .map_err(|err| ApiError::Internal(err.to_string()))
                })
                .collect()
        })
        .collect()
}
