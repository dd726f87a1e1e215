use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::catalog::{EquipmentFilter, LivestockFilter};
use crate::models::*;
use crate::pricing::BuildTotals;
use crate::session::SessionError;

type ApiResult<T> = Result<T, (StatusCode, String)>;

// ============================================================
// Error Handling
// ============================================================

/// Log a session error and return a sanitized response to the client.
/// The full error is logged server-side; clients only see a generic message.
fn internal_error(e: SessionError) -> (StatusCode, String) {
    match e {
        // Already logged at error level by the scope.
        SessionError::OutsideScope => {}
        other => tracing::error!("Internal error: {:#}", other),
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn not_found(what: &str, id: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("{} not found: {}", what, id))
}

// ============================================================
// Request / Response Types
// ============================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct AddLineInput {
    pub id: String,
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddPhotoInput {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
    pub build: AquariumBuild,
    pub totals: BuildTotals,
    /// Present only while the build is public.
    pub share_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityResponse {
    pub is_public: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct EquipmentQuery {
    pub q: Option<String>,
    /// Comma-separated category names
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LivestockQuery {
    pub q: Option<String>,
    pub kind: Option<String>,
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Catalog
// ============================================================

pub async fn search_equipment(
    State(state): State<AppState>,
    Query(query): Query<EquipmentQuery>,
) -> ApiResult<Json<Vec<Equipment>>> {
    let mut filter = EquipmentFilter {
        query: query.q.unwrap_or_default(),
        ..Default::default()
    };
    for name in query
        .category
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let category = EquipmentCategory::from_str(name).ok_or((
            StatusCode::BAD_REQUEST,
            format!("Unknown equipment category: {}", name),
        ))?;
        filter.categories.insert(category);
    }

    let items = state.catalog.search_equipment(&filter);
    Ok(Json(items.into_iter().cloned().collect()))
}

pub async fn get_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Equipment>> {
    state
        .catalog
        .find_equipment(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Equipment", &id))
}

pub async fn search_livestock(
    State(state): State<AppState>,
    Query(query): Query<LivestockQuery>,
) -> ApiResult<Json<Vec<Livestock>>> {
    let kind = match query.kind.as_deref().filter(|k| !k.is_empty()) {
        Some(kind) => Some(LivestockKind::from_str(kind).ok_or((
            StatusCode::BAD_REQUEST,
            format!("Unknown livestock kind: {}", kind),
        ))?),
        None => None,
    };
    let filter = LivestockFilter {
        query: query.q.unwrap_or_default(),
        kind,
    };

    let items = state.catalog.search_livestock(&filter);
    Ok(Json(items.into_iter().cloned().collect()))
}

// ============================================================
// Build
// ============================================================

fn current_build(state: &AppState) -> ApiResult<Json<AquariumBuild>> {
    state
        .scope
        .with(|session| session.build().clone())
        .map(Json)
        .map_err(internal_error)
}

pub async fn get_build(State(state): State<AppState>) -> ApiResult<Json<AquariumBuild>> {
    current_build(&state)
}

pub async fn update_build(
    State(state): State<AppState>,
    Json(input): Json<UpdateBuildInput>,
) -> ApiResult<Json<AquariumBuild>> {
    state
        .scope
        .try_with(|session| session.update_build(input))
        .map_err(internal_error)?;
    current_build(&state)
}

pub async fn reset_build(State(state): State<AppState>) -> ApiResult<Json<AquariumBuild>> {
    state
        .scope
        .try_with(|session| session.reset_build())
        .map_err(internal_error)?;
    current_build(&state)
}

pub async fn get_summary(State(state): State<AppState>) -> ApiResult<Json<BuildSummary>> {
    state
        .scope
        .with(|session| BuildSummary {
            build: session.build().clone(),
            totals: BuildTotals::of(session.build()),
            share_url: session.share_url(&state.share_base_url),
        })
        .map(Json)
        .map_err(internal_error)
}

pub async fn toggle_visibility(
    State(state): State<AppState>,
) -> ApiResult<Json<VisibilityResponse>> {
    state
        .scope
        .try_with(|session| session.toggle_visibility())
        .map(|is_public| Json(VisibilityResponse { is_public }))
        .map_err(internal_error)
}

pub async fn add_equipment(
    State(state): State<AppState>,
    Json(input): Json<AddLineInput>,
) -> ApiResult<Json<AquariumBuild>> {
    let item = state
        .catalog
        .find_equipment(&input.id)
        .ok_or_else(|| not_found("Equipment", &input.id))?;
    state
        .scope
        .try_with(|session| session.add_equipment(item, input.quantity))
        .map_err(internal_error)?;
    current_build(&state)
}

pub async fn remove_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AquariumBuild>> {
    state
        .scope
        .try_with(|session| session.remove_equipment(&id))
        .map_err(internal_error)?;
    current_build(&state)
}

fn find_livestock<'a>(
    state: &'a AppState,
    id: &str,
    kind: LivestockKind,
) -> ApiResult<&'a Livestock> {
    let item = state
        .catalog
        .find_livestock(id)
        .ok_or_else(|| not_found("Livestock", id))?;
    if item.kind != kind {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("{} is a {}, not a {}", id, item.kind.as_str(), kind.as_str()),
        ));
    }
    Ok(item)
}

pub async fn add_fish(
    State(state): State<AppState>,
    Json(input): Json<AddLineInput>,
) -> ApiResult<Json<AquariumBuild>> {
    let item = find_livestock(&state, &input.id, LivestockKind::Fish)?;
    state
        .scope
        .try_with(|session| session.add_fish(item, input.quantity))
        .map_err(internal_error)?;
    current_build(&state)
}

pub async fn remove_fish(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AquariumBuild>> {
    state
        .scope
        .try_with(|session| session.remove_fish(&id))
        .map_err(internal_error)?;
    current_build(&state)
}

pub async fn add_plant(
    State(state): State<AppState>,
    Json(input): Json<AddLineInput>,
) -> ApiResult<Json<AquariumBuild>> {
    let item = find_livestock(&state, &input.id, LivestockKind::Plant)?;
    state
        .scope
        .try_with(|session| session.add_plant(item, input.quantity))
        .map_err(internal_error)?;
    current_build(&state)
}

pub async fn remove_plant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AquariumBuild>> {
    state
        .scope
        .try_with(|session| session.remove_plant(&id))
        .map_err(internal_error)?;
    current_build(&state)
}

pub async fn add_photo(
    State(state): State<AppState>,
    Json(input): Json<AddPhotoInput>,
) -> ApiResult<(StatusCode, Json<AquariumBuild>)> {
    if input.url.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Photo url is empty".to_string()));
    }
    state
        .scope
        .try_with(|session| session.add_photo(input.url))
        .map_err(internal_error)?;
    current_build(&state).map(|build| (StatusCode::CREATED, build))
}

pub async fn remove_photo(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<Json<AquariumBuild>> {
    state
        .scope
        .try_with(|session| session.remove_photo(index))
        .map_err(internal_error)?;
    current_build(&state)
}

// ============================================================
// Comments
// ============================================================

pub async fn list_comments(State(state): State<AppState>) -> ApiResult<Json<Vec<Comment>>> {
    state
        .scope
        .with(|session| session.comments().to_vec())
        .map(Json)
        .map_err(internal_error)
}

pub async fn post_comment(
    State(state): State<AppState>,
    Json(input): Json<CreateCommentInput>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    state
        .scope
        .with(|session| session.post_comment(input))
        .map_err(internal_error)?
        .map(|comment| (StatusCode::CREATED, Json(comment)))
        .ok_or((
            StatusCode::BAD_REQUEST,
            "Comment content is empty".to_string(),
        ))
}
