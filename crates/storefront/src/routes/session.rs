//! Session route handlers.
//!
//! The presentation layer reads the snapshot and sends intents; it never
//! mutates state any other way.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{Span, instrument};

use crate::error::{AppError, Result, sync_sentry_user};
use crate::session::{Intent, SessionSnapshot};
use crate::state::AppState;

/// Current session snapshot.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session().snapshot())
}

/// Apply one intent and return the resulting snapshot.
///
/// A rejected intent responds with its error; the snapshot (including the
/// recorded last error) is still available from `GET /state`.
#[instrument(skip(state, payload), fields(intent = tracing::field::Empty))]
pub async fn dispatch(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Intent>, JsonRejection>,
) -> Result<Json<SessionSnapshot>> {
    let Json(intent) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    Span::current().record("intent", intent.name());

    let outcome = state.session().dispatch(intent).await?;
    sync_sentry_user(state.session().snapshot().user.as_ref());

    Ok(Json(outcome?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    use crate::config::StorefrontConfig;
    use crate::session::SessionConfig;
    use crate::state::AppState;

    fn router() -> Router {
        let mut config = StorefrontConfig::from_lookup(|_| None).unwrap();
        config.session = SessionConfig::immediate();
        let (state, _task) = AppState::new(config, CancellationToken::new()).unwrap();
        crate::app(state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_intent(body: &Value) -> Request<Body> {
        Request::post("/intents")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_state_starts_on_login() {
        let app = router();
        let (status, body) = send(&app, Request::get("/state").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["screen"], "login");
        assert_eq!(body["pending"], false);
    }

    #[tokio::test]
    async fn test_login_then_add_to_cart() {
        let app = router();
        let (status, body) = send(
            &app,
            post_intent(&json!({"type": "login", "username": "devicelab", "password": "robustest"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["screen"], "products");
        assert_eq!(body["header"]["greeting"], "Hello, devicelab!");

        let (status, body) =
            send(&app, post_intent(&json!({"type": "add_to_cart", "id": "Appium"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cart"]["total"], "$7.50");
    }

    #[tokio::test]
    async fn test_rejected_intent_returns_error_body() {
        let app = router();
        let (status, body) = send(
            &app,
            post_intent(&json!({"type": "login", "username": "devicelab", "password": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "Password is required");
    }

    #[tokio::test]
    async fn test_malformed_intent_is_bad_request() {
        let app = router();
        let (status, body) = send(&app, post_intent(&json!({"type": "teleport"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }
}
