/*
 * Responsibility
 * - Actors の request/response DTO
 * - 必須項目の有無チェック (欠けていれば 422)
 */
use serde::{Deserialize, Serialize};

use crate::repos::actor_repo::ActorRow;

#[derive(Debug, Deserialize)]
pub struct CreateActorRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct NewActor {
    pub name: String,
    pub age: i32,
    pub gender: String,
}

impl CreateActorRequest {
    pub fn validate(self) -> Result<NewActor, &'static str> {
        let (Some(name), Some(age), Some(gender)) = (self.name, self.age, self.gender) else {
            return Err("name, age and gender are required");
        };
        if name.trim().is_empty() {
            return Err("name cannot be empty");
        }
        if age < 0 {
            return Err("age must be non-negative");
        }

        Ok(NewActor { name, age, gender })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateActorRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

impl UpdateActorRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.is_none() && self.age.is_none() && self.gender.is_none() {
            return Err("at least one of name, age or gender is required");
        }
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err("name cannot be empty");
        }
        if let Some(age) = self.age
            && age < 0
        {
            return Err("age must be non-negative");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ActorResponse {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub gender: String,
}

impl From<ActorRow> for ActorResponse {
    fn from(row: ActorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            age: row.age,
            gender: row.gender,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActorListResponse {
    pub success: bool,
    pub actors: Vec<ActorResponse>,
}

#[derive(Debug, Serialize)]
pub struct SingleActorResponse {
    pub success: bool,
    pub actor: ActorResponse,
}
