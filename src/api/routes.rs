/*
 * Responsibility
 * - URL 構造の定義
 * - handler ごとに必要な permission を登録時に指定する (auth::require)
 */
use axum::{
    Router,
    handler::Handler,
    routing::{get, patch},
};

use crate::api::handlers::{
    actors::{create_actor, delete_actor, list_actors, update_actor},
    health::health,
    movies::{create_movie, delete_movie, list_movies, update_movie},
};
use crate::middleware::auth::require;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/actors",
            get(list_actors.layer(require(state, "get:actors")))
                .post(create_actor.layer(require(state, "post:actors"))),
        )
        .route(
            "/actors/{actor_id}",
            patch(update_actor.layer(require(state, "patch:actors")))
                .delete(delete_actor.layer(require(state, "delete:actors"))),
        )
        .route(
            "/movies",
            get(list_movies.layer(require(state, "get:movies")))
                .post(create_movie.layer(require(state, "post:movies"))),
        )
        .route(
            "/movies/{movie_id}",
            patch(update_movie.layer(require(state, "patch:movies")))
                .delete(delete_movie.layer(require(state, "delete:movies"))),
        )
}
