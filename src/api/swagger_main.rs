use crate::dto;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(info(
    title = "Task Manager API",
    description = "Manages users and the tasks they own"
))]
struct TaskManagerApi;

/// Constructs the route on the API that renders the swagger UI and returns the OpenAPI schema.
/// Merges in OpenAPI definitions from the [dto] package and submodules of [api][crate::api]
pub fn build_documentation() -> SwaggerUi {
    let mut api_docs = TaskManagerApi::openapi();
    api_docs.merge(dto::OpenApiSchemas::openapi());
    api_docs.merge(super::user::UsersApi::openapi());
    api_docs.merge(super::todo::TaskApi::openapi());

    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_docs)
}
