//! Filmes API routes

use std::time::Duration;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    models::{CreateFilmeDto, Filme, FilmeQuery, NewFilme, ReadFilmeDto, UpdateFilmeDto},
    patch::PatchDocument,
    state::AppState,
    validation::{BODY_KEY, ValidationReport, validate},
};

/// Create the router for the Filmes API
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/Filme", post(create_filme).get(list_filmes))
        .route(
            "/Filme/:id",
            get(get_filme)
                .put(update_filme)
                .patch(patch_filme)
                .delete(delete_filme),
        )
        .with_state(state)
}

/// Router wrapped with request tracing and a per-request timeout
pub fn app(state: AppState, request_timeout: Duration) -> Router {
    create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "filmes-api"
    }))
}

/// Create a new movie
pub async fn create_filme(
    State(state): State<AppState>,
    payload: Result<Json<CreateFilmeDto>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(dto) = payload?;
    validate(&dto)?;

    let filme = state.filmes.add(NewFilme::from(dto)).await?;
    info!(id = filme.id, "Created filme");

    let location = format!("/Filme/{}", filme.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ReadFilmeDto::from(filme)),
    ))
}

/// List movies with skip/take pagination
pub async fn list_filmes(
    State(state): State<AppState>,
    query: Result<Query<FilmeQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ReadFilmeDto>>> {
    let Query(query) = query?;
    let (skip, take) = query.bounds();

    let filmes = state.filmes.list(skip, take).await?;

    Ok(Json(filmes.into_iter().map(ReadFilmeDto::from).collect()))
}

/// Get a movie by ID
pub async fn get_filme(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<ReadFilmeDto>> {
    let Path(id) = id?;
    let filme = find_filme(&state, id).await?;

    Ok(Json(ReadFilmeDto::from(filme)))
}

/// Replace every updatable field of a movie
pub async fn update_filme(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateFilmeDto>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let Json(dto) = payload?;

    let mut filme = find_filme(&state, id).await?;
    validate(&dto)?;

    dto.apply_to(&mut filme);
    save_filme(&state, &filme).await?;
    info!(id, "Updated filme");

    Ok(StatusCode::NO_CONTENT)
}

/// Apply a JSON Patch document to a movie
pub async fn patch_filme(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<PatchDocument>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let Json(patch) = payload?;

    let mut filme = find_filme(&state, id).await?;
    let patched = patched_projection(&filme, &patch)?;

    patched.apply_to(&mut filme);
    save_filme(&state, &filme).await?;
    info!(id, operations = patch.0.len(), "Patched filme");

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a movie by ID
pub async fn delete_filme(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;

    if !state.filmes.remove(id).await? {
        return Err(ApiError::filme_not_found(id));
    }
    info!(id, "Deleted filme");

    Ok(StatusCode::NO_CONTENT)
}

async fn find_filme(state: &AppState, id: i32) -> ApiResult<Filme> {
    state
        .filmes
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::filme_not_found(id))
}

async fn save_filme(state: &AppState, filme: &Filme) -> ApiResult<()> {
    // The row can disappear between lookup and save.
    if state.filmes.save(filme).await? {
        Ok(())
    } else {
        Err(ApiError::filme_not_found(filme.id))
    }
}

/// Project `filme` to its update DTO, patch it and revalidate the result
fn patched_projection(filme: &Filme, patch: &PatchDocument) -> ApiResult<UpdateFilmeDto> {
    let projection = serde_json::to_value(UpdateFilmeDto::from(filme)).map_err(|e| {
        error!("Failed to serialize filme {}: {}", filme.id, e);
        ApiError::InternalServerError
    })?;

    let mut document = projection.clone();
    patch
        .apply(&mut document)
        .map_err(ValidationReport::from)?;
    reject_unknown_members(&projection, &document)?;

    let dto: UpdateFilmeDto = serde_json::from_value(document)
        .map_err(|e| ValidationReport::single(BODY_KEY, e.to_string()))?;
    validate(&dto)?;

    Ok(dto)
}

/// Members added by a patch that the projection does not carry, such as `id`
fn reject_unknown_members(projection: &Value, patched: &Value) -> Result<(), ValidationReport> {
    // A non-object result is reported when it is deserialized.
    let (Some(known), Some(members)) = (projection.as_object(), patched.as_object()) else {
        return Ok(());
    };

    let mut report = ValidationReport::new();
    for member in members.keys().filter(|member| !known.contains_key(*member)) {
        report.add(member.clone(), format!("'{}' is not an updatable member", member));
    }

    if report.is_empty() {
        Ok(())
    } else {
        Err(report)
    }
}
