use axum::async_trait;
use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_macros::{FromRequest, FromRequestParts};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::error;
use utoipa::openapi::{RefOr, Schema};
use utoipa::{ToSchema, openapi};
use validator::ValidationErrors;

use crate::domain;

/// Contains diagnostic information about an API failure
#[derive(Serialize, Debug, ToSchema)]
pub struct BasicErrorResponse {
    #[schema(example = "not_found")]
    error_code: String,
    #[schema(example = "The requested entity could not be found.")]
    error_description: String,
    extra_info: Option<ExtraInfo>,
}

impl BasicErrorResponse {
    fn new(error_code: &str, error_description: &str, extra_info: Option<ExtraInfo>) -> Self {
        BasicErrorResponse {
            error_code: error_code.to_owned(),
            error_description: error_description.to_owned(),
            extra_info,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(untagged)]
pub enum ExtraInfo {
    ValidationIssues(ValidationErrorSchema),
    Message(String),
}

/// Stand-in OpenAPI schema for [ValidationErrors] which just provides an empty object
#[derive(Serialize, Debug)]
#[serde(transparent)]
pub struct ValidationErrorSchema(ValidationErrors);

impl<'schem> ToSchema<'schem> for ValidationErrorSchema {
    fn schema() -> (&'schem str, RefOr<Schema>) {
        (
            "ValidationErrorSchema",
            openapi::ObjectBuilder::new().into(),
        )
    }
}

/// Response type which turns domain errors into [BasicErrorResponse]s with a matching status code
pub struct DomainErrorResponse(domain::Error);

impl From<domain::Error> for DomainErrorResponse {
    fn from(value: domain::Error) -> Self {
        Self(value)
    }
}

impl IntoResponse for DomainErrorResponse {
    fn into_response(self) -> Response {
        match self.0 {
            domain::Error::Invalid(validation_errors) => (
                StatusCode::BAD_REQUEST,
                Json(BasicErrorResponse::new(
                    "invalid_input",
                    "Submitted data was invalid.",
                    Some(ExtraInfo::ValidationIssues(ValidationErrorSchema(
                        validation_errors,
                    ))),
                )),
            )
                .into_response(),

            domain::Error::MissingReference { entity, id, .. } => (
                StatusCode::BAD_REQUEST,
                Json(BasicErrorResponse::new(
                    "invalid_reference",
                    "Submitted data referred to something that does not exist.",
                    Some(ExtraInfo::Message(format!("{entity} with ID {id} does not exist"))),
                )),
            )
                .into_response(),

            domain::Error::DoesNotExist => (
                StatusCode::NOT_FOUND,
                Json(BasicErrorResponse::new(
                    "not_found",
                    "The requested entity could not be found.",
                    None,
                )),
            )
                .into_response(),

            domain::Error::RetrieveFailure { action, cause } => {
                error!("Failed to {action}: {cause:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(BasicErrorResponse::new(
                        "internal_error",
                        "Could not access data to complete your request",
                        None,
                    )),
                )
                    .into_response()
            }
        }
    }
}

/// Wrapper for [axum::Json] which customizes the error response to use our
/// data structure for API errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// JSON body extractor which does not look at the request's Content-Type header, only at
/// whether the body can be read and parsed
pub struct AnyContentJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for AnyContentJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| JsonErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error_code: "unreadable_body",
                error_description: "The request body could not be read.",
                parse_problem: rejection.body_text(),
            })?;

        serde_json::from_slice(&body)
            .map(AnyContentJson)
            .map_err(|parse_err| JsonErrorResponse::malformed(parse_err.to_string()))
    }
}

/// Response type representing JSON parse errors
pub struct JsonErrorResponse {
    status: StatusCode,
    error_code: &'static str,
    error_description: &'static str,
    parse_problem: String,
}

impl JsonErrorResponse {
    fn malformed(parse_problem: String) -> Self {
        JsonErrorResponse {
            status: StatusCode::BAD_REQUEST,
            error_code: "invalid_json",
            error_description: "The passed request body contained malformed or unreadable JSON.",
            parse_problem,
        }
    }
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        let parse_problem = value.body_text();
        match value {
            JsonRejection::MissingJsonContentType(_) => JsonErrorResponse {
                status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
                error_code: "unsupported_media_type",
                error_description: "The request body must be sent as application/json.",
                parse_problem,
            },
            _ => JsonErrorResponse::malformed(parse_problem),
        }
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            axum::Json(BasicErrorResponse::new(
                self.error_code,
                self.error_description,
                Some(ExtraInfo::Message(self.parse_problem)),
            )),
        )
            .into_response()
    }
}

/// Wrapper for [axum::extract::Path] which reports unparseable path parameters with our
/// data structure for API errors
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(PathErrorResponse))]
pub struct Path<T>(pub T);

/// Response type representing path parameters which could not be parsed, such as a
/// non-numeric ID
pub struct PathErrorResponse {
    parse_problem: String,
}

impl From<PathRejection> for PathErrorResponse {
    fn from(value: PathRejection) -> Self {
        PathErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for PathErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(BasicErrorResponse::new(
                "invalid_path",
                "The request path contained an invalid ID.",
                Some(ExtraInfo::Message(self.parse_problem)),
            )),
        )
            .into_response()
    }
}
