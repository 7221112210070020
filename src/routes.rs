use crate::api::{swagger_main, todo, user};
use crate::{SharedData, logging};
use axum::Router;
use std::sync::Arc;

/// Assembles the full application router: task and user routes, the swagger UI, and
/// request tracing
pub fn build_router(shared_data: Arc<SharedData>) -> Router {
    let api_routes = Router::new()
        .merge(todo::task_routes())
        .merge(user::user_routes())
        .with_state(shared_data);

    let router = Router::new()
        .merge(api_routes)
        .merge(swagger_main::build_documentation());

    logging::attach_tracing_http(router)
}
