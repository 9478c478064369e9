use std::net::SocketAddr;
use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, financial_items, goals, roadmap};

pub fn build_app(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(auth::router())
                .merge(financial_items::router())
                .merge(goals::router())
                .merge(roadmap::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: Duration, span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms = ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms = ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tokens::JwtKeys;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn bearer(state: &AppState) -> String {
        let pair = JwtKeys::from(&state.config.jwt)
            .issue_pair(Uuid::new_v4())
            .unwrap();
        format!("Bearer {}", pair.access_token)
    }

    fn json_post(uri: &str, body: String) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(res: axum::response::Response) -> String {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_is_open() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_text(res).await, "ok");
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        for (method, uri) in [
            (Method::GET, "/api/me"),
            (Method::GET, "/api/financial-items"),
            (Method::GET, "/api/goals"),
            (Method::GET, "/api/roadmap"),
            (Method::POST, "/api/roadmap/generate"),
            (Method::DELETE, "/api/roadmap"),
        ] {
            let app = build_app(AppState::fake());
            let req = Request::builder()
                .method(method.clone())
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let res = app.oneshot(req).await.unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn refresh_token_is_not_an_access_token() {
        let state = AppState::fake();
        let refresh = JwtKeys::from(&state.config.jwt)
            .issue_pair(Uuid::new_v4())
            .unwrap()
            .refresh_token;
        let app = build_app(state);

        let res = app
            .oneshot(
                Request::get("/api/roadmap")
                    .header(header::AUTHORIZATION, format!("Bearer {refresh}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(res).await, "Access token required");
    }

    #[tokio::test]
    async fn malformed_authorization_header_is_401() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(
                Request::get("/api/goals")
                    .header(header::AUTHORIZATION, "Token abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(res).await, "Invalid Authorization header");
    }

    #[tokio::test]
    async fn refresh_rejects_access_token() {
        let state = AppState::fake();
        let access = JwtKeys::from(&state.config.jwt)
            .issue_pair(Uuid::new_v4())
            .unwrap()
            .access_token;
        let app = build_app(state);

        let res = app
            .oneshot(json_post(
                "/api/auth/refresh",
                format!(r#"{{"refresh_token": "{access}"}}"#),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(res).await, "Refresh token required");
    }

    #[tokio::test]
    async fn register_validates_before_storage() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(json_post(
                "/api/auth/register",
                r#"{"email": "not-an-email", "password": "long-enough-pw"}"#.into(),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(res).await, "Invalid email");
    }

    #[tokio::test]
    async fn register_hides_storage_failures() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(json_post(
                "/api/auth/register",
                r#"{"email": "saver@example.com", "password": "long-enough-pw"}"#.into(),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(res).await, "Internal server error");
    }

    #[tokio::test]
    async fn login_hides_storage_failures() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(json_post(
                "/api/auth/login",
                r#"{"email": "saver@example.com", "password": "long-enough-pw"}"#.into(),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(res).await, "Internal server error");
    }

    #[tokio::test]
    async fn progress_out_of_range_is_rejected_before_storage() {
        for progress in ["150", "-1"] {
            let state = AppState::fake();
            let auth = bearer(&state);
            let app = build_app(state);

            let res = app
                .oneshot(
                    Request::put("/api/roadmap/progress/1")
                        .header(header::AUTHORIZATION, auth)
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(format!(r#"{{"progress": {progress}}}"#)))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_text(res).await, "Progress must be between 0 and 100");
        }
    }

    #[tokio::test]
    async fn progress_on_a_non_numeric_step_is_404() {
        for step in ["abc", "0", "-2"] {
            let state = AppState::fake();
            let auth = bearer(&state);
            let app = build_app(state);

            let res = app
                .oneshot(
                    Request::put(format!("/api/roadmap/progress/{step}"))
                        .header(header::AUTHORIZATION, auth)
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(r#"{"progress": 40}"#))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "step {step}");
            assert_eq!(body_text(res).await, "Step not found");
        }
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
