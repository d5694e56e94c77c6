// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::Uri,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    routing::post,
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    auth::{guard::authorize, middleware::authenticate, AuthError, SecurityContext},
    error::ApiError,
    state::AppState,
};

pub mod auth;
pub mod categories;
pub mod comments;
pub mod health;
pub mod posts;
pub mod users;

/// Build the application router.
///
/// Layers, outermost first: CORS, request id, tracing, the authentication
/// filter, then (per route) the authorization guard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/api/posts/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route(
            "/api/posts/category/{id}",
            get(posts::list_posts_by_category),
        )
        .route(
            "/api/v1/comments/posts/{post_id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/api/v1/comments/posts/{post_id}/comments/{comment_id}",
            get(comments::get_comment)
                .put(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route(
            "/api/v1/categories",
            get(categories::list_categories).post(categories::add_category),
        )
        .route(
            "/api/v1/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/signin", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/signup", post(auth::register))
        .route("/api/users/me", get(users::me))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route_layer(middleware::from_fn_with_state(state.clone(), authorize))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Unrouted paths require authentication like any other operation missing
/// from the access policy; authenticated callers get a 404.
async fn not_found(context: SecurityContext, uri: Uri) -> Response {
    if !context.is_authenticated() {
        return AuthError::Unauthenticated.into_response();
    }
    ApiError::not_found(format!("No resource at {}", uri.path())).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::service::{AccountService, SeedAdmin};
    use crate::state::test_support::test_state;
    use crate::storage::{
        Category, CategoryRepository, Post, PostRepository, Repository, UserRepository,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use tempfile::TempDir;
    use tower::ServiceExt;

    const ENTRY_POINT_MESSAGE: &str = "Full authentication is required to access this resource";

    struct TestApp {
        _dir: TempDir,
        state: AppState,
        admin_token: String,
        user_token: String,
    }

    fn app() -> TestApp {
        let (dir, state) = test_state();
        let accounts = AccountService::new(&state.db, &state.tokens);
        accounts
            .seed_admin(&SeedAdmin {
                username: "root".into(),
                email: "root@example.com".into(),
                password: "admin-pass".into(),
            })
            .unwrap();
        accounts
            .register(crate::models::RegisterDto {
                name: "Alice".into(),
                username: "alice".into(),
                email: "alice@example.com".into(),
                password: "user-pass".into(),
            })
            .unwrap();

        TestApp {
            admin_token: state.tokens.issue("root").unwrap(),
            user_token: state.tokens.issue("alice").unwrap(),
            _dir: dir,
            state,
        }
    }

    impl TestApp {
        async fn send(
            &self,
            method: Method,
            uri: &str,
            authorization: Option<&str>,
            body: Option<serde_json::Value>,
        ) -> Response {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(value) = authorization {
                builder = builder.header(header::AUTHORIZATION, value);
            }
            let body = match body {
                Some(json) => {
                    builder = builder.header(header::CONTENT_TYPE, "application/json");
                    Body::from(json.to_string())
                }
                None => Body::empty(),
            };
            router(self.state.clone())
                .oneshot(builder.body(body).unwrap())
                .await
                .unwrap()
        }

        fn seed_category(&self) -> u64 {
            CategoryRepository::new(&self.state.db)
                .save(Category {
                    id: 0,
                    name: "Rust".into(),
                    description: "Systems".into(),
                })
                .unwrap()
                .id
        }

        fn post_count(&self) -> usize {
            PostRepository::new(&self.state.db)
                .find_where(|_: &Post| true)
                .unwrap()
                .len()
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_body(category_id: u64) -> serde_json::Value {
        serde_json::json!({
            "title": "Borrowing",
            "description": "How the borrow checker works",
            "content": "Shared xor mutable.",
            "categoryId": category_id,
        })
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (_dir, state) = test_state();
        let _ = router(state).into_make_service();
    }

    #[tokio::test]
    async fn public_reads_need_no_token() {
        let app = app();
        let response = app.send(Method::GET, "/api/posts", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["pageNo"], 0);
        assert_eq!(body["pageSize"], 10);
        assert_eq!(body["content"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn missing_header_on_protected_route_is_401() {
        let app = app();
        let response = app.send(Method::GET, "/api/users/me", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, ENTRY_POINT_MESSAGE);
    }

    #[tokio::test]
    async fn basic_credentials_are_treated_as_anonymous() {
        let app = app();
        let response = app
            .send(Method::GET, "/api/users/me", Some("Basic xyz"), None)
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, ENTRY_POINT_MESSAGE);
    }

    #[tokio::test]
    async fn token_from_another_secret_is_401() {
        let app = app();
        let foreign = crate::auth::TokenCodec::new(b"fedcba9876543210fedcba9876543210", 60_000)
            .unwrap()
            .issue("root")
            .unwrap();
        let response = app
            .send(
                Method::POST,
                "/api/v1/categories",
                Some(&format!("Bearer {foreign}")),
                Some(serde_json::json!({"name": "Go", "description": "Gophers"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expired_token_is_401() {
        let app = app();
        let issued_ms = chrono::Utc::now().timestamp_millis() - 2 * app.state.tokens.lifetime_ms();
        let expired = app.state.tokens.issue_at("root", issued_ms).unwrap();

        let response = app
            .send(
                Method::POST,
                "/api/v1/categories",
                Some(&format!("Bearer {expired}")),
                Some(serde_json::json!({"name": "Go", "description": "Gophers"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, ENTRY_POINT_MESSAGE);
    }

    #[tokio::test]
    async fn token_of_deleted_account_is_401() {
        let app = app();
        let users = UserRepository::new(&app.state.db);
        let alice = users.find_by_username("alice").unwrap().unwrap();
        assert!(users.delete(alice.id).unwrap());

        let response = app
            .send(
                Method::GET,
                "/api/users/me",
                Some(&format!("Bearer {}", app.user_token)),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, ENTRY_POINT_MESSAGE);
    }

    #[tokio::test]
    async fn admin_token_reaches_admin_route() {
        let app = app();
        let category_id = app.seed_category();
        let response = app
            .send(
                Method::POST,
                "/api/posts",
                Some(&format!("Bearer {}", app.admin_token)),
                Some(post_body(category_id)),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(app.post_count(), 1);
    }

    #[tokio::test]
    async fn user_token_on_admin_route_is_403_and_handler_not_run() {
        let app = app();
        let category_id = app.seed_category();
        let response = app
            .send(
                Method::POST,
                "/api/posts",
                Some(&format!("Bearer {}", app.user_token)),
                Some(post_body(category_id)),
            )
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(app.post_count(), 0);

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["message"], "Access Denied");
    }

    #[tokio::test]
    async fn authenticated_user_may_comment_and_read_profile() {
        let app = app();
        let category_id = app.seed_category();
        let post = PostRepository::new(&app.state.db)
            .save(Post {
                id: 0,
                title: "Title".into(),
                description: "Description text".into(),
                content: "Content".into(),
                category_id,
            })
            .unwrap();
        let bearer = format!("Bearer {}", app.user_token);

        let response = app
            .send(
                Method::POST,
                &format!("/api/v1/comments/posts/{}/comments", post.id),
                Some(&bearer),
                Some(serde_json::json!({
                    "name": "Alice",
                    "email": "alice@example.com",
                    "body": "Thanks for writing this",
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.send(Method::GET, "/api/users/me", Some(&bearer), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["username"], "alice");
        assert_eq!(body["roles"], serde_json::json!([Role::User.as_str()]));
    }

    #[tokio::test]
    async fn login_issues_usable_token() {
        let app = app();
        let response = app
            .send(
                Method::POST,
                "/api/auth/signin",
                None,
                Some(serde_json::json!({"usernameOrEmail": "root@example.com", "password": "admin-pass"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["tokenType"], "Bearer");
        let token = body["accessToken"].as_str().unwrap();

        let response = app
            .send(
                Method::DELETE,
                "/api/v1/categories/1",
                Some(&format!("Bearer {token}")),
                None,
            )
            .await;
        // Authorized; the category simply does not exist
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn wrong_password_is_401_bad_credentials() {
        let app = app();
        let response = app
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(serde_json::json!({"usernameOrEmail": "root", "password": "nope"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["message"], "Bad credentials");
    }

    #[tokio::test]
    async fn validation_failure_returns_field_map() {
        let app = app();
        let response = app
            .send(
                Method::POST,
                "/api/posts",
                Some(&format!("Bearer {}", app.admin_token)),
                Some(serde_json::json!({"title": "T", "content": "c", "categoryId": 1})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["title"], "Title must have at least 2 characters");
        assert_eq!(body["description"], "Description cannot be empty");
    }

    #[tokio::test]
    async fn unknown_paths_require_authentication() {
        let app = app();
        let response = app.send(Method::GET, "/api/nowhere", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .send(
                Method::GET,
                "/api/nowhere",
                Some(&format!("Bearer {}", app.user_token)),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn request_id_is_propagated() {
        let app = app();
        let response = app.send(Method::GET, "/health", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }
}
