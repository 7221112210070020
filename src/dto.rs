use crate::routing_utils::{BasicErrorResponse, ExtraInfo, ValidationErrorSchema};
use utoipa::OpenApi;

pub mod task;
pub mod user;

/// Collects the request/response bodies used by the API so they show up in the OpenAPI document
#[derive(OpenApi)]
#[openapi(components(schemas(
    task::NewTask,
    task::TodoTask,
    user::NewUser,
    user::TodoUser,
    BasicErrorResponse,
    ExtraInfo,
    ValidationErrorSchema,
)))]
pub struct OpenApiSchemas;
