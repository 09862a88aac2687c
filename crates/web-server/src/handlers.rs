use crate::{enrichment, error::AppError, AppState};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use core_types::validation::{
    parse_project_payload, validate_currency_request, validate_new_project,
    validate_project_id, validate_project_payload,
};
use core_types::{EnrichedProject, Project};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// The projects the `/api-conversion` endpoint is willing to convert.
pub const SPECIFIC_PROJECTS: [&str; 4] = [
    "Peking roasted duck Chanel",
    "Choucroute Cartier",
    "Rigua Nintendo",
    "Llapingacho Instagram",
];

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

const PROJECT_NOT_FOUND: &str = "Project not found";
const NO_MATCHING_PROJECTS: &str = "No projects found with the specified name and year";

/// # GET /ok
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// # GET /project/budget/:id
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Project>, AppError> {
    let project_id = validate_project_id(&raw_id)?;

    let project = state
        .store
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(PROJECT_NOT_FOUND.to_string()))?;

    Ok(Json(project))
}

/// # POST /project/budget
/// Creates a project under its caller-assigned id and echoes it back.
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let Json(body) = body?;
    let payload = parse_project_payload(body)?;
    let project = validate_new_project(&payload)?;

    if state.store.exists(project.project_id).await? {
        return Err(AppError::Conflict(crate::error::DUPLICATE_PROJECT.to_string()));
    }

    state.store.insert(&project).await?;
    tracing::info!(project_id = project.project_id, "Project created.");

    Ok((StatusCode::CREATED, Json(project)))
}

/// # PUT /project/budget/:id
/// Replaces every field except the id. Partial updates are rejected.
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let project_id = validate_project_id(&raw_id)?;
    let Json(body) = body?;
    let payload = parse_project_payload(body)?;
    let fields = validate_project_payload(&payload)?;

    if !state.store.exists(project_id).await? {
        return Err(AppError::NotFound(PROJECT_NOT_FOUND.to_string()));
    }

    // The row may have been deleted since the existence check.
    if state.store.update(project_id, &fields).await? == 0 {
        return Err(AppError::NotFound(PROJECT_NOT_FOUND.to_string()));
    }
    tracing::info!(project_id, "Project updated.");

    Ok(Json(MessageResponse {
        success: true,
        message: "Project budget updated successfully",
    }))
}

/// # DELETE /project/budget/:id
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let project_id = validate_project_id(&raw_id)?;

    if !state.store.exists(project_id).await? {
        return Err(AppError::NotFound(PROJECT_NOT_FOUND.to_string()));
    }

    if state.store.remove(project_id).await? == 0 {
        return Err(AppError::NotFound(PROJECT_NOT_FOUND.to_string()));
    }
    tracing::info!(project_id, "Project deleted.");

    Ok(Json(MessageResponse {
        success: true,
        message: "Project deleted successfully",
    }))
}

/// # GET | PUT | DELETE /project/budget/currency
/// The literal segment `currency` is read as a project id for every method but POST.
pub async fn currency_segment_as_id() -> AppError {
    validate_project_id("currency").map_or_else(AppError::from, |_| {
        AppError::NotFound(PROJECT_NOT_FOUND.to_string())
    })
}

/// Any route or method the router does not know.
pub async fn not_found() -> AppError {
    AppError::NotFound("Resource not found".to_string())
}

/// # POST /project/budget/currency
/// Finds projects by name and year and attaches their final budget in TTD when asked.
pub async fn find_budget_with_currency(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DataResponse<Vec<EnrichedProject>>>, AppError> {
    let Json(body) = body?;
    let request = validate_currency_request(&body)?;

    let data = lookup_and_enrich(&state, &request.project_name, request.year, &request.currency).await?;
    Ok(Json(DataResponse { success: true, data }))
}

/// # POST /api-conversion
/// Like `/project/budget/currency`, restricted to `SPECIFIC_PROJECTS`.
pub async fn convert_specific_project(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DataResponse<Vec<EnrichedProject>>>, AppError> {
    let Json(body) = body?;
    let request = validate_currency_request(&body)?;

    if !SPECIFIC_PROJECTS.contains(&request.project_name.as_str()) {
        return Err(AppError::BadRequest(
            "Project not in the specific conversion list".to_string(),
        ));
    }

    let data = lookup_and_enrich(&state, &request.project_name, request.year, &request.currency).await?;
    Ok(Json(DataResponse { success: true, data }))
}

async fn lookup_and_enrich(
    state: &AppState,
    project_name: &str,
    year: i32,
    currency: &str,
) -> Result<Vec<EnrichedProject>, AppError> {
    let projects = state.store.find_by_name_and_year(project_name, year).await?;
    if projects.is_empty() {
        return Err(AppError::NotFound(NO_MATCHING_PROJECTS.to_string()));
    }

    Ok(enrichment::enrich(&state.converter, projects, currency).await)
}
