//! Authentication middleware: validates the bearer JWT issued by
//! `handlers::auth::login` and injects an [`AuthContext`] into request
//! extensions for downstream handlers to read.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use database::models::{AdminId, AdminRole, TenantId};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tower::{Layer, Service};

use crate::state::AppState;

/// JWT claims minted by `handlers::auth::login` (`spec.md` §4.2, admin
/// identity). `role` is carried in the token rather than re-fetched from
/// `admins` on every request, since a role change takes effect on the
/// admin's next login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: AdminId,
    pub tenant_id: TenantId,
    pub role: AdminRole,
    pub exp: i64,
}

/// Authenticated principal, attached to `Request` extensions by this
/// middleware and read back out with an `Extension<AuthContext>` extractor
/// in handlers that require it.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub admin_id: AdminId,
    pub tenant_id: TenantId,
    pub role: AdminRole,
}

#[derive(Clone)]
pub struct AuthMiddleware {
    state: AppState,
}

impl AuthMiddleware {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for AuthMiddleware {
    type Service = AuthMiddlewareService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddlewareService {
            inner,
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthMiddlewareService<S> {
    inner: S,
    state: AppState,
}

impl<S> Service<Request> for AuthMiddlewareService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        let mut inner = self.inner.clone();
        let state = self.state.clone();

        Box::pin(async move {
            match authenticate(&state, &request) {
                Ok(ctx) => {
                    request.extensions_mut().insert(ctx);
                    inner.call(request).await
                }
                Err(status) => {
                    let mut response = Response::default();
                    *response.status_mut() = status;
                    Ok(response)
                }
            }
        })
    }
}

fn authenticate(state: &AppState, request: &Request) -> Result<AuthContext, StatusCode> {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let secret = &state.config().security.jwt_secret;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;

    Ok(AuthContext {
        admin_id: data.claims.sub,
        tenant_id: data.claims.tenant_id,
        role: data.claims.role,
    })
}

/// Authentication handler function (alternative approach, unused by
/// `routes::create_routes` but kept as the function-middleware variant of
/// the [`AuthMiddleware`] tower layer above).
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let ctx = authenticate(&state, &request)?;
    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}
