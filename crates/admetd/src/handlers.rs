//! HTTP handlers and response shapes.
//!
//! Every failure surfaces as structured JSON with an explicit status
//! field, never a bare trace. Unresolvable property aliases map to a
//! client-error code; pool exhaustion (when a timeout is configured)
//! maps to 503.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use admet_core::{AdmetError, PropertyDescriptor, SmilesReport, CATALOG};

use crate::routes::AppState;

/// Health probe response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "admetd is running".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Catalog listing response.
#[derive(Debug, Serialize)]
pub struct PropertiesResponse {
    pub total: usize,
    pub properties: Vec<PropertyDescriptor>,
}

pub async fn properties() -> Json<PropertiesResponse> {
    Json(PropertiesResponse {
        total: CATALOG.len(),
        properties: CATALOG.to_vec(),
    })
}

/// Body of a single-SMILES prediction request.
#[derive(Debug, Deserialize)]
pub struct SmilesRequest {
    pub smiles: String,
    /// Property aliases to predict; omit for the full catalog.
    #[serde(default)]
    pub property: Option<Vec<String>>,
}

pub async fn predict_smiles(
    State(state): State<AppState>,
    Json(req): Json<SmilesRequest>,
) -> Result<Json<SmilesReport>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("smi", request_id = %request_id);
    async move {
        let report = state
            .service
            .predict_one(&req.smiles, req.property.as_deref())
            .await
            .map_err(|err| ApiError::for_smiles(&req.smiles, err))?;
        Ok(Json(report))
    }
    .instrument(span)
    .await
}

/// Response for a bulk SMILES upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub requested_properties: Vec<&'static str>,
    pub total_smiles: usize,
    pub results: Vec<SmilesReport>,
}

pub async fn upload_smiles(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("upload_smi", request_id = %request_id);
    async move {
        let upload = read_upload(multipart).await?;
        let smiles_list = split_smiles_lines(&upload.contents);

        let aliases = if upload.properties.is_empty() {
            None
        } else {
            Some(upload.properties)
        };
        let requested = state
            .service
            .resolver()
            .resolve_many(aliases.as_deref())
            .map_err(ApiError::from_error)?;

        let results = state
            .service
            .predict_batch_resolved(&smiles_list, &requested)
            .await
            .map_err(ApiError::from_error)?;

        info!(
            event = "upload.finished",
            filename = %upload.filename,
            total_smiles = smiles_list.len(),
        );

        Ok(Json(UploadResponse {
            filename: upload.filename,
            requested_properties: requested,
            total_smiles: smiles_list.len(),
            results,
        }))
    }
    .instrument(span)
    .await
}

struct UploadParts {
    filename: String,
    contents: String,
    properties: Vec<String>,
}

/// Pull the SMILES file part and any repeated `property` parts out of a
/// multipart body. Exactly one non-`property` part is treated as the file.
async fn read_upload(mut multipart: Multipart) -> Result<UploadParts, ApiError> {
    let mut filename = String::from("upload.smi");
    let mut contents: Option<String> = None;
    let mut properties = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("malformed multipart body: {err}")))?
    {
        let name = field.name().map(str::to_string);
        if name.as_deref() == Some("property") {
            let value = field
                .text()
                .await
                .map_err(|err| ApiError::bad_request(format!("unreadable property field: {err}")))?;
            properties.push(value);
        } else {
            if let Some(original) = field.file_name() {
                filename = original.to_string();
            }
            let text = field
                .text()
                .await
                .map_err(|err| ApiError::bad_request(format!("unreadable file field: {err}")))?;
            contents = Some(text);
        }
    }

    let contents = contents.ok_or_else(|| ApiError::bad_request("missing SMILES file part"))?;
    Ok(UploadParts {
        filename,
        contents,
        properties,
    })
}

/// One SMILES per line; surrounding whitespace is trimmed and blank lines
/// are skipped.
fn split_smiles_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Request-level failure, rendered as the standard error report body.
#[derive(Debug)]
pub struct ApiError {
    smiles: Option<String>,
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn for_smiles(smiles: &str, err: AdmetError) -> Self {
        Self {
            smiles: Some(smiles.to_string()),
            status: status_for(&err),
            message: err.to_string(),
        }
    }

    fn from_error(err: AdmetError) -> Self {
        Self {
            smiles: None,
            status: status_for(&err),
            message: err.to_string(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            smiles: None,
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

fn status_for(err: &AdmetError) -> StatusCode {
    match err {
        AdmetError::UnknownProperty { .. } => StatusCode::BAD_REQUEST,
        AdmetError::AcquireTimeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::Map::new();
        if let Some(smiles) = self.smiles {
            body.insert("smiles".to_string(), serde_json::Value::String(smiles));
        }
        body.insert("status".to_string(), "error".into());
        body.insert(
            "results".to_string(),
            serde_json::Value::Object(serde_json::Map::new()),
        );
        body.insert("error".to_string(), self.message.into());
        (self.status, Json(serde_json::Value::Object(body))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_smiles_lines_skips_blanks() {
        let contents = "CCO\n\n  CCN  \n\t\nc1ccccc1\n";
        assert_eq!(split_smiles_lines(contents), vec!["CCO", "CCN", "c1ccccc1"]);
    }

    #[test]
    fn test_split_smiles_lines_empty_payload() {
        assert!(split_smiles_lines("").is_empty());
        assert!(split_smiles_lines("\n\n").is_empty());
    }

    #[test]
    fn test_unknown_property_maps_to_client_error() {
        let err = AdmetError::UnknownProperty {
            alias: "bogus".to_string(),
            recognized: String::new(),
        };
        assert_eq!(status_for(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_pool_timeout_maps_to_service_unavailable() {
        let err = AdmetError::AcquireTimeout { waited_secs: 5 };
        assert_eq!(status_for(&err), StatusCode::SERVICE_UNAVAILABLE);
    }
}
