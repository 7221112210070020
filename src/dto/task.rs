use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domain;

/// DTO for creating a new task via the API
#[derive(Deserialize, ToSchema)]
#[cfg_attr(test, derive(Serialize))]
pub struct NewTask {
    #[schema(example = "Buy milk")]
    pub desc: String,
    #[schema(example = 1)]
    pub userid: i32,
}

impl From<NewTask> for domain::todo::NewTask {
    fn from(value: NewTask) -> Self {
        domain::todo::NewTask {
            owner_user_id: value.userid,
            description: value.desc,
        }
    }
}

/// DTO for a returned task on the API
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct TodoTask {
    #[schema(example = 10)]
    pub id: i32,
    #[schema(example = "Buy milk")]
    pub desc: String,
    /// Whether the task has been completed
    #[schema(example = false)]
    pub status: bool,
    #[schema(example = 1)]
    pub userid: i32,
}

impl From<domain::todo::TodoTask> for TodoTask {
    fn from(value: domain::todo::TodoTask) -> Self {
        TodoTask {
            id: value.id,
            desc: value.description,
            status: value.completed,
            userid: value.owner_user_id,
        }
    }
}
