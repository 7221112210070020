use crate::domain::user::driving_ports::UserPort;
use crate::external_connections::ExternalConnectivity;
use crate::persistence::db_user_driven_ports::DbUserGateway;
use crate::routing_utils::{BasicErrorResponse, DomainErrorResponse, Json, Path};
use crate::{AppState, SharedData, domain, dto};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(create_user, list_users, get_user, delete_user))]
/// Defines the OpenAPI documentation for the user API
pub struct UsersApi;
/// Constant used to group user endpoints in OpenAPI documentation
pub const USER_API_GROUP: &str = "Users";

/// Builds a router for all the user routes
pub fn user_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/users",
            post(
                |State(app_state): AppState, Json(new_user): Json<dto::user::NewUser>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let user_service = domain::user::UserService {};

                    create_user(new_user, &mut ext_cxn, &user_service).await
                },
            )
            .get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let user_service = domain::user::UserService {};

                list_users(&mut ext_cxn, &user_service).await
            }),
        )
        .route(
            "/users/:user_id",
            get(
                |State(app_state): AppState, Path(user_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let user_service = domain::user::UserService {};

                    get_user(user_id, &mut ext_cxn, &user_service).await
                },
            )
            .delete(
                |State(app_state): AppState, Path(user_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let user_service = domain::user::UserService {};

                    delete_user(user_id, &mut ext_cxn, &user_service).await
                },
            ),
        )
}

#[utoipa::path(
    post,
    path = "/users",
    tag = USER_API_GROUP,
    request_body = dto::user::NewUser,
    responses(
        (status = 201, description = "User created", body = dto::user::TodoUser),
        (status = 400, description = "Invalid or malformed user", body = BasicErrorResponse),
        (status = 415, description = "Body was not sent as JSON", body = BasicErrorResponse),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
#[tracing::instrument(skip_all)]
/// Creates a user
async fn create_user(
    new_user: dto::user::NewUser,
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl UserPort,
) -> Result<(StatusCode, Json<dto::user::TodoUser>), ErrorResponse> {
    info!("Attempt to create user: {new_user}");
    let domain_user = domain::user::CreateUser::from(new_user);

    let created_user = user_service
        .create_user(&domain_user, &mut *ext_cxn, &DbUserGateway)
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok((
        StatusCode::CREATED,
        Json(dto::user::TodoUser::from(created_user)),
    ))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = USER_API_GROUP,
    responses(
        (status = 200, description = "Every user in the system", body = Vec<dto::user::TodoUser>),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
#[tracing::instrument(skip_all)]
/// Retrieves a list of all the users in the system
async fn list_users(
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl UserPort,
) -> Result<Json<Vec<dto::user::TodoUser>>, ErrorResponse> {
    info!("Requested users");
    let users = user_service
        .list_users(&mut *ext_cxn, &DbUserGateway)
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok(Json(users.into_iter().map(dto::user::TodoUser::from).collect()))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = USER_API_GROUP,
    params(("user_id" = i32, Path, description = "ID of the user")),
    responses(
        (status = 200, description = "The requested user", body = dto::user::TodoUser),
        (status = 400, description = "Non-numeric user ID", body = BasicErrorResponse),
        (status = 404, description = "User does not exist", body = BasicErrorResponse),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
#[tracing::instrument(skip(ext_cxn, user_service))]
/// Retrieves a single user
async fn get_user(
    user_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl UserPort,
) -> Result<Json<dto::user::TodoUser>, ErrorResponse> {
    info!("Get user {user_id}");
    let user = user_service
        .get_user(user_id, &mut *ext_cxn, &DbUserGateway)
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok(Json(dto::user::TodoUser::from(user)))
}

#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    tag = USER_API_GROUP,
    params(("user_id" = i32, Path, description = "ID of the user")),
    responses(
        (status = 200, description = "User removed, including when no such user existed", body = String),
        (status = 400, description = "Non-numeric user ID", body = BasicErrorResponse),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
#[tracing::instrument(skip(ext_cxn, user_service))]
/// Deletes a user. Tasks the user owns are left in place.
async fn delete_user(
    user_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl UserPort,
) -> Result<(StatusCode, String), ErrorResponse> {
    info!("Deleting user {user_id}");
    user_service
        .delete_user(user_id, &mut *ext_cxn, &DbUserGateway)
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok((StatusCode::OK, format!("User {user_id} Removed")))
}
