/*
 * Responsibility
 * - /movies 系 handler (list / create / update / delete)
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
            movies::{
                CreateMovieRequest, MovieListResponse, SingleMovieResponse, UpdateMovieRequest,
            },
        },
        extractors::Claims,
    },
    error::AppError,
    repos::movie_repo,
    state::AppState,
};

pub async fn list_movies(
    State(state): State<AppState>,
    Claims(_claims): Claims,
) -> Result<Json<MovieListResponse>, AppError> {
    let rows = movie_repo::list(&state.db).await?;

    if rows.is_empty() {
        return Err(AppError::not_found("movies"));
    }

    Ok(Json(MovieListResponse {
        success: true,
        movies: rows.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_movie(
    State(state): State<AppState>,
    Claims(claims): Claims,
    payload: Result<Json<CreateMovieRequest>, JsonRejection>,
) -> Result<Json<SingleMovieResponse>, AppError> {
    let Json(req) = payload?;
    let movie = req.validate().map_err(AppError::unprocessable)?;

    let row = movie_repo::create(&state.db, &movie.title, movie.release_date).await?;
    tracing::info!(movie_id = row.id, subject = claims.subject(), "movie created");

    Ok(Json(SingleMovieResponse {
        success: true,
        movie: row.into(),
    }))
}

pub async fn update_movie(
    State(state): State<AppState>,
    Claims(claims): Claims,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateMovieRequest>, JsonRejection>,
) -> Result<Json<SingleMovieResponse>, AppError> {
    let Path(movie_id) = path?;
    let Json(req) = payload?;
    req.validate().map_err(AppError::unprocessable)?;

    let row = movie_repo::update(&state.db, movie_id, req.title.as_deref(), req.release_date)
        .await?
        .ok_or(AppError::not_found("movie"))?;
    tracing::info!(movie_id, subject = claims.subject(), "movie updated");

    Ok(Json(SingleMovieResponse {
        success: true,
        movie: row.into(),
    }))
}

pub async fn delete_movie(
    State(state): State<AppState>,
    Claims(claims): Claims,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeletedResponse>, AppError> {
    let Path(movie_id) = path?;

    if !movie_repo::delete(&state.db, movie_id).await? {
        return Err(AppError::not_found("movie"));
    }
    tracing::info!(movie_id, subject = claims.subject(), "movie deleted");

    Ok(Json(DeletedResponse {
        success: true,
        deleted: movie_id,
    }))
}
