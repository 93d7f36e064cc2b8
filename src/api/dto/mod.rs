pub mod actors;
pub mod movies;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub deleted: i32,
}
