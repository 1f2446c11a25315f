// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access-period middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Middleware that rejects requests once the access period has expired.
pub async fn require_active_period(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let now = chrono::Utc::now();
    if state.expiry.is_expired(now) {
        tracing::warn!(
            path = %request.uri().path(),
            expires_at = ?state.expiry.expires_at(),
            "Rejected request after expiry"
        );
        return AppError::Expired.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::ActivityStore;
    use crate::services::{ExpiryGuard, ExpiryPolicy};
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::{routing::get, Router};
    use tower::ServiceExt; // for oneshot

    fn app_with_policy(policy: ExpiryPolicy) -> Router {
        let mut state = AppState::new(Config::default(), ActivityStore::new());
        state.expiry = ExpiryGuard::new(policy, chrono::Utc::now());
        let state = Arc::new(state);

        Router::new()
            .route("/", get(|| async { "Hello" }))
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                require_active_period,
            ))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_expired_period_is_rejected() {
        let past = chrono::Utc::now() - chrono::Duration::days(1);
        let app = app_with_policy(ExpiryPolicy::ExpiresAt(past));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_active_period_passes_through() {
        let app = app_with_policy(ExpiryPolicy::default());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
