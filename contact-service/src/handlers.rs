// ============================================================================
// Request Handlers
// ============================================================================
//
// Every mutating handler validates before touching the store, checks the
// Connection Manager for availability, and releases its pooled connection
// as soon as the query future completes.
//
// ============================================================================

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use contact_error::{AppError, AppResult};
use contact_types::{normalize_search_term, parse_contact_id, validate_payload, ContactPayload};
use serde_json::{json, Value};

use crate::extract::AppJson;
use crate::state::AppState;

pub(crate) const AVAILABLE_ROUTES: [&str; 9] = [
    "GET /",
    "GET /api/status",
    "GET /api/health",
    "POST /api/contact",
    "GET /api/contact",
    "GET /api/contact/:id",
    "PUT /api/contact/:id",
    "DELETE /api/contact/:id",
    "GET /api/contact/search/:term",
];

/// GET / - liveness: answers healthy whenever the process is serving
pub async fn root_info() -> impl IntoResponse {
    Json(json!({
        "message": "Contact backend API is running",
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/status - service metadata
pub async fn api_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "api": "Contact backend",
        "status": "active",
        "database": state.manager.state_label().await,
        "endpoints": AVAILABLE_ROUTES,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /api/health - readiness: the store must answer a trivial query
///
/// Failures carry the store's reported error so operators can tell a
/// configuration problem (access denied, unknown database) from a network
/// outage.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let pool = match state.manager.acquire().await {
        Ok(pool) => pool,
        Err(err) => return unhealthy(err.to_string()),
    };

    match sqlx::query("SELECT 1").fetch_one(&pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "timestamp": Utc::now().to_rfc3339(),
            })),
        ),
        Err(err) => {
            let detail = err.to_string();
            state.store_error("health check", err);
            unhealthy(detail)
        }
    }
}

fn unhealthy(detail: String) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "status": "unhealthy",
            "database": "disconnected",
            "error": detail,
        })),
    )
}

/// POST /api/contact
pub async fn create_contact(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ContactPayload>,
) -> AppResult<impl IntoResponse> {
    let contact = validate_payload(&payload)?;

    let pool = state.manager.acquire().await?;
    let id = contact_db::insert_contact(&pool, &contact)
        .await
        .map_err(|e| state.store_error("insert contact", e))?;

    tracing::info!(contact_id = id, "Contact saved");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Message saved successfully",
            "id": id,
        })),
    ))
}

/// GET /api/contact
pub async fn list_contacts(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let pool = state.manager.acquire().await?;
    let contacts = contact_db::list_contacts(&pool)
        .await
        .map_err(|e| state.store_error("list contacts", e))?;

    Ok(Json(json!({
        "count": contacts.len(),
        "contacts": contacts,
    })))
}

/// GET /api/contact/search/:term
pub async fn search_contacts(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> AppResult<Json<Value>> {
    let term = normalize_search_term(&term)?;

    let pool = state.manager.acquire().await?;
    let contacts = contact_db::search_contacts(&pool, &term)
        .await
        .map_err(|e| state.store_error("search contacts", e))?;

    Ok(Json(json!({
        "searchTerm": term,
        "count": contacts.len(),
        "contacts": contacts,
    })))
}

/// GET /api/contact/:id
pub async fn get_contact(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_contact_id(&raw_id)?;

    let pool = state.manager.acquire().await?;
    let contact = contact_db::get_contact(&pool, id)
        .await
        .map_err(|e| state.store_error("get contact", e))?;

    match contact {
        Some(contact) => Ok(Json(json!({ "contact": contact }))),
        None => Err(AppError::not_found(format!(
            "Contact with id {} not found",
            id
        ))),
    }
}

/// PUT /api/contact/:id
pub async fn update_contact(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    AppJson(payload): AppJson<ContactPayload>,
) -> AppResult<Json<Value>> {
    let id = parse_contact_id(&raw_id)?;
    let contact = validate_payload(&payload)?;

    let pool = state.manager.acquire().await?;
    let updated = contact_db::update_contact(&pool, id, &contact)
        .await
        .map_err(|e| state.store_error("update contact", e))?;

    if !updated {
        return Err(AppError::not_found(format!(
            "Contact with id {} not found",
            id
        )));
    }

    tracing::info!(contact_id = id, "Contact updated");

    Ok(Json(json!({
        "message": "Contact updated successfully",
        "id": id,
    })))
}

/// DELETE /api/contact/:id
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_contact_id(&raw_id)?;

    let pool = state.manager.acquire().await?;
    let deleted = contact_db::delete_contact(&pool, id)
        .await
        .map_err(|e| state.store_error("delete contact", e))?;

    if !deleted {
        return Err(AppError::not_found(format!(
            "Contact with id {} not found",
            id
        )));
    }

    tracing::info!(contact_id = id, "Contact deleted");

    Ok(Json(json!({
        "message": "Contact deleted successfully",
        "id": id,
    })))
}

/// Fallback for unmatched routes
pub async fn route_not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Route not found",
            "path": uri.path(),
            "method": method.as_str(),
            "availableRoutes": AVAILABLE_ROUTES,
        })),
    )
}
