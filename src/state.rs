/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - db: PgPool, auth: Authorizer
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::Authorizer;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub auth: Arc<Authorizer>,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, auth: Arc<Authorizer>) -> Self {
        Self { db, auth }
    }
}
