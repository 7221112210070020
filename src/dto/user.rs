use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domain;

/// DTO for a constructed user
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct TodoUser {
    #[schema(example = 4)]
    pub id: i32,
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "a@b.com")]
    pub email: String,
}

impl From<domain::user::TodoUser> for TodoUser {
    fn from(value: domain::user::TodoUser) -> Self {
        TodoUser {
            id: value.id,
            name: value.name,
            email: value.email,
        }
    }
}

/// DTO for creating a new user via the API
#[derive(Deserialize, Display, ToSchema)]
#[display("{name} <{email}>")]
#[cfg_attr(test, derive(Serialize))]
pub struct NewUser {
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "a@b.com")]
    pub email: String,
}

impl From<NewUser> for domain::user::CreateUser {
    fn from(value: NewUser) -> Self {
        domain::user::CreateUser {
            name: value.name,
            email: value.email,
        }
    }
}
