/*
 * Responsibility
 * - /actors 系 handler (list / create / update / delete)
 * - 認可は routes 側で handler ごとに layer を掛ける。ここでは Claims を受け取るだけ
 * - Json / Path の rejection は AppError に変換して統一フォーマットで返す
 */
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    api::{
        dto::{
            DeletedResponse,
            actors::{
                ActorListResponse, CreateActorRequest, SingleActorResponse, UpdateActorRequest,
            },
        },
        extractors::Claims,
    },
    error::AppError,
    repos::actor_repo,
    state::AppState,
};

pub async fn list_actors(
    State(state): State<AppState>,
    Claims(_claims): Claims,
) -> Result<Json<ActorListResponse>, AppError> {
    let rows = actor_repo::list(&state.db).await?;

    if rows.is_empty() {
        return Err(AppError::not_found("actors"));
    }

    Ok(Json(ActorListResponse {
        success: true,
        actors: rows.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_actor(
    State(state): State<AppState>,
    Claims(claims): Claims,
    payload: Result<Json<CreateActorRequest>, JsonRejection>,
) -> Result<Json<SingleActorResponse>, AppError> {
    let Json(req) = payload?;
    let actor = req.validate().map_err(AppError::unprocessable)?;

    let row = actor_repo::create(&state.db, &actor.name, actor.age, &actor.gender).await?;
    tracing::info!(actor_id = row.id, subject = claims.subject(), "actor created");

    Ok(Json(SingleActorResponse {
        success: true,
        actor: row.into(),
    }))
}

pub async fn update_actor(
    State(state): State<AppState>,
    Claims(claims): Claims,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateActorRequest>, JsonRejection>,
) -> Result<Json<SingleActorResponse>, AppError> {
    let Path(actor_id) = path?;
    let Json(req) = payload?;
    req.validate().map_err(AppError::unprocessable)?;

    let row = actor_repo::update(
        &state.db,
        actor_id,
        req.name.as_deref(),
        req.age,
        req.gender.as_deref(),
    )
    .await?
    .ok_or(AppError::not_found("actor"))?;
    tracing::info!(actor_id, subject = claims.subject(), "actor updated");

    Ok(Json(SingleActorResponse {
        success: true,
        actor: row.into(),
    }))
}

pub async fn delete_actor(
    State(state): State<AppState>,
    Claims(claims): Claims,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeletedResponse>, AppError> {
    let Path(actor_id) = path?;

    if !actor_repo::delete(&state.db, actor_id).await? {
        return Err(AppError::not_found("actor"));
    }
    tracing::info!(actor_id, subject = claims.subject(), "actor deleted");

    Ok(Json(DeletedResponse {
        success: true,
        deleted: actor_id,
    }))
}
