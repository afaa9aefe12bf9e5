//! # API REST
//!
//! REST API for the RRF case-file validator.
//!
//! Handles:
//! - a browser upload form and its HTML result page
//! - a JSON validation endpoint for scripted clients
//! - OpenAPI/Swagger documentation
//!
//! Validation is CPU bound, so handlers hand the work to the blocking pool. Every failure is
//! reported in the response and logged; nothing a client sends can take the server down.

#![warn(rust_2018_idioms)]

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use rrf_core::constants::MAX_CASE_FILE_BYTES;
use rrf_core::{CaseFileValidator, CoreResult, ValidationReport, ValidationResult, ValidatorConfig};

/// Multipart part carrying the uploaded case file.
const CASE_FILE_PART: &str = "casefile";

const UPLOAD_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>RRF case-file validator</title></head>
<body>
<h1>RRF case-file validator</h1>
<form method="post" action="/" enctype="multipart/form-data">
<input type="file" name="casefile" accept=".xml"/>
<input type="submit" value="Validate"/>
</form>
</body>
</html>
"#;

/// Application state shared across REST API handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    validator: Arc<CaseFileValidator>,
}

impl AppState {
    pub fn new(validator: CaseFileValidator) -> Self {
        Self {
            validator: Arc::new(validator),
        }
    }

    /// Build the state from a startup configuration, loading the reference tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference tables cannot be loaded.
    pub fn from_config(config: ValidatorConfig) -> CoreResult<Self> {
        let registry = config.load_registry()?;
        Ok(Self::new(CaseFileValidator::new(Arc::new(registry), config)))
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Outcome of validating one case file.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub success: bool,
    pub validator_id: Option<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl From<ValidationReport> for ValidateRes {
    fn from(report: ValidationReport) -> Self {
        Self {
            file_name: report.file_name,
            success: report.success,
            validator_id: report.validator_id,
            errors: report.errors,
            warnings: report.warnings,
        }
    }
}

/// Upload form accepted by `POST /`.
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    /// The case file.
    #[schema(value_type = String, format = Binary)]
    pub casefile: Vec<u8>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadParams {
    /// When present, answer with a JSON array of error messages instead of HTML.
    pub json: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ValidateParams {
    /// Glob pattern restricting the parsers tried (`v4`, `v*`).
    pub parser: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, upload_page, upload_case_file, validate_case_file),
    components(schemas(HealthRes, ValidateRes, UploadForm))
)]
pub struct ApiDoc;

/// Build the REST router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(upload_page).post(upload_case_file))
        .route("/validate", post(validate_case_file))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(MAX_CASE_FILE_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// # Returns
/// * `Json<HealthRes>` - Always `ok`
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "RRF validator REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Case-file upload form", content_type = "text/html", body = String)
    )
)]
#[axum::debug_handler]
async fn upload_page(State(_state): State<AppState>) -> Html<&'static str> {
    Html(UPLOAD_PAGE)
}

#[utoipa::path(
    post,
    path = "/",
    params(UploadParams),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Validation errors as an HTML list, or a JSON array with `?json`", body = [String]),
        (status = 400, description = "No case file in the upload"),
        (status = 500, description = "Internal server error")
    )
)]
/// Validate a case file uploaded from the browser form
///
/// # Arguments
/// * `params` - `?json` switches the response to a JSON array of error messages
/// * `multipart` - Form data with a `casefile` part
///
/// # Errors
/// Returns `400 Bad Request` if the upload cannot be read or has no `casefile` part, and
/// `500 Internal Server Error` if validation cannot be run.
#[axum::debug_handler]
async fn upload_case_file(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    multipart: Multipart,
) -> Result<Response, (StatusCode, String)> {
    let (file_name, bytes) = read_case_file_part(multipart).await?;
    tracing::info!("validating uploaded case file {:?} ({} bytes)", file_name, bytes.len());

    let mut result = run_validation(&state, bytes, Vec::new()).await?;
    if let Some(file_name) = file_name {
        result.set_file_name(file_name);
    }

    if params.json.is_some() {
        Ok(Json(result.error_messages()).into_response())
    } else {
        Ok(Html(render_result_page(&result)).into_response())
    }
}

#[utoipa::path(
    post,
    path = "/validate",
    params(ValidateParams),
    request_body(content = String, content_type = "application/xml", description = "Case-file XML"),
    responses(
        (status = 200, description = "Validation report", body = ValidateRes),
        (status = 400, description = "Parser pattern matches nothing"),
        (status = 500, description = "Internal server error")
    )
)]
/// Validate a case file sent as the request body
///
/// # Arguments
/// * `params` - Optional `parser` glob restricting the rule-sets tried
/// * `body` - Raw case-file bytes
///
/// # Returns
/// * `Ok(Json<ValidateRes>)` - The validation report, passing or not
///
/// # Errors
/// Returns `400 Bad Request` if the parser pattern is invalid or matches nothing, and
/// `500 Internal Server Error` if validation cannot be run.
#[axum::debug_handler]
async fn validate_case_file(
    State(state): State<AppState>,
    Query(params): Query<ValidateParams>,
    body: Bytes,
) -> Result<Json<ValidateRes>, (StatusCode, String)> {
    let ids = match params.parser.as_deref() {
        Some(pattern) => state.validator.select(&[pattern]).map_err(|e| {
            tracing::warn!("Parser selection error: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        })?,
        None => Vec::new(),
    };

    let result = run_validation(&state, body, ids).await?;
    Ok(Json(ValidationReport::from(&result).into()))
}

async fn read_case_file_part(
    mut multipart: Multipart,
) -> Result<(Option<String>, Bytes), (StatusCode, String)> {
    loop {
        let field = multipart.next_field().await.map_err(|e| {
            tracing::warn!("Multipart read error: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        })?;
        let Some(field) = field else {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Missing '{CASE_FILE_PART}' part"),
            ));
        };
        if field.name() != Some(CASE_FILE_PART) {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await.map_err(|e| {
            tracing::warn!("Multipart read error: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        })?;
        return Ok((file_name, bytes));
    }
}

async fn run_validation(
    state: &AppState,
    bytes: Bytes,
    ids: Vec<String>,
) -> Result<ValidationResult, (StatusCode, String)> {
    let validator = Arc::clone(&state.validator);
    let result = tokio::task::spawn_blocking(move || validator.validate_with(&bytes, &ids))
        .await
        .map_err(|e| {
            tracing::error!("Validation task error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
        })?;

    if result.is_failure() {
        tracing::info!(
            "validation failed with {} error(s) (validator {:?})",
            result.errors().len(),
            result.validator_id()
        );
    }
    Ok(result)
}

fn render_result_page(result: &ValidationResult) -> String {
    let items = if result.is_success() {
        "<li>OK</li>\n".to_string()
    } else {
        result
            .errors()
            .iter()
            .map(|issue| format!("<li>{}</li>\n", escape_html(&issue.message)))
            .collect()
    };
    let heading = match result.file_name() {
        Some(file_name) => format!("Validation result for {}", escape_html(file_name)),
        None => "Validation result".to_string(),
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>RRF case-file validator</title></head>\n<body>\n\
         <h1>{heading}</h1>\n<ul>\n{items}</ul>\n<a href=\"/\">Validate another file</a>\n</body>\n</html>\n"
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
