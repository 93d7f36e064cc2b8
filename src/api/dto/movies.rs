/*
 * Responsibility
 * - Movies の request/response DTO
 * - release_date は公開年 (整数)
 */
use serde::{Deserialize, Serialize};

use crate::repos::movie_repo::MovieRow;

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    pub release_date: Option<i32>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub release_date: i32,
}

impl CreateMovieRequest {
    pub fn validate(self) -> Result<NewMovie, &'static str> {
        let (Some(title), Some(release_date)) = (self.title, self.release_date) else {
            return Err("title and release_date are required");
        };
        if title.trim().is_empty() {
            return Err("title cannot be empty");
        }

        Ok(NewMovie {
            title,
            release_date,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub release_date: Option<i32>,
}

impl UpdateMovieRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.is_none() && self.release_date.is_none() {
            return Err("at least one of title or release_date is required");
        }
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("title cannot be empty");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: i32,
    pub title: String,
    pub release_date: i32,
}

impl From<MovieRow> for MovieResponse {
    fn from(row: MovieRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            release_date: row.release_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub success: bool,
    pub movies: Vec<MovieResponse>,
}

#[derive(Debug, Serialize)]
pub struct SingleMovieResponse {
    pub success: bool,
    pub movie: MovieResponse,
}
