//! API routes configuration

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{admins, auth, health, invitations, members, tenants},
    middleware::{auth::AuthMiddleware, logging::LoggingMiddleware, metrics::MetricsMiddleware},
    state::AppState,
};

/// Create application routes
pub fn create_routes(state: AppState) -> Router {
    let config = state.config();

    // Create middleware stack
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(config.server.client_timeout.into()))
        .layer(RequestBodyLimitLayer::new(10 * 1024 * 1024)) // 10MB limit
        .layer(MetricsMiddleware::new())
        .layer(LoggingMiddleware::new())
        .layer(CorsLayer::permissive()); // Configure CORS as needed

    // Health check routes (no auth required)
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/live", get(health::liveness_check));

    // Capability-token endpoints: unauthenticated by design, since the
    // token itself is the credential (spec.md §4.5).
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/tenants", post(tenants::create_tenant).get(tenants::list_tenants))
        .route("/tenants/:id", get(tenants::get_tenant).delete(tenants::delete_tenant))
        .route("/invitations/accept", post(invitations::accept_invitation))
        .route("/license-keys/redeem", post(invitations::redeem_license_key))
        .route("/auth/reset-password", post(invitations::reset_password));

    // Protected, tenant-scoped API routes (auth required)
    let tenant_routes = Router::new()
        .route(
            "/tenants/:tenant_id/admins",
            get(admins::list_admins).post(admins::create_admin),
        )
        .route(
            "/tenants/:tenant_id/admins/:id",
            get(admins::get_admin)
                .put(admins::update_admin)
                .delete(admins::delete_admin),
        )
        .route(
            "/tenants/:tenant_id/members",
            get(members::list_members).post(members::create_member),
        )
        .route(
            "/tenants/:tenant_id/members/:id",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        .layer(AuthMiddleware::new(state.clone()));

    // Combine all routes
    Router::new()
        .merge(health_routes)
        .nest(
            "/api/v1",
            Router::new().merge(public_routes).merge(tenant_routes),
        )
        .layer(middleware)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use shared::AppConfig;

    #[tokio::test]
    async fn test_health_routes() {
        let config = AppConfig::default();

        // This test would require running database and Redis instances
        // In a real test environment, you would use testcontainers
        // let state = AppState::new(config).await.unwrap();
        // let app = create_routes(state);
        // let server = TestServer::new(app).unwrap();

        // let response = server.get("/health").await;
        // assert_eq!(response.status_code(), StatusCode::OK);
    }
}
