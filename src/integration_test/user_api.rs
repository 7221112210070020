use super::test_util;
use crate::api::test_util::{deserialize_body, read_text};
use crate::{SharedData, dto, persistence, routes};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use std::sync::Arc;
use tower::ServiceExt;

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn can_create_and_remove_user() {
    test_util::prepare_db_and_test(|pool| async move {
        let router = routes::build_router(Arc::new(SharedData {
            ext_cxn: persistence::ExternalConnectivity::new(pool),
        }));

        let create_request = Request::builder()
            .method(Method::POST)
            .uri("/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name": "Evan", "email": "evan@example.com"}"#))
            .expect("request should build");
        let response = router
            .clone()
            .oneshot(create_request)
            .await
            .expect("router is infallible");
        assert_eq!(StatusCode::CREATED, response.status());
        let created: dto::user::TodoUser = deserialize_body(response.into_body()).await;

        let get_request = Request::builder()
            .uri(format!("/users/{}", created.id))
            .body(Body::empty())
            .expect("request should build");
        let response = router
            .clone()
            .oneshot(get_request)
            .await
            .expect("router is infallible");
        let fetched: dto::user::TodoUser = deserialize_body(response.into_body()).await;
        assert_eq!(created, fetched);

        let delete_request = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/users/{}", created.id))
            .body(Body::empty())
            .expect("request should build");
        let response = router
            .clone()
            .oneshot(delete_request)
            .await
            .expect("router is infallible");
        assert_eq!(StatusCode::OK, response.status());

        // Removing a user that is already gone still reports success
        let delete_again = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/users/{}", created.id))
            .body(Body::empty())
            .expect("request should build");
        let response = router
            .oneshot(delete_again)
            .await
            .expect("router is infallible");
        assert_eq!(StatusCode::OK, response.status());
        assert_eq!(
            format!("User {} Removed", created.id),
            read_text(response.into_body()).await
        );
    });
}
