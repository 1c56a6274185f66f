use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use lifeblood_api::ResolvedIdentity;

use crate::errors::{Error, Result};
use crate::state::AppState;

/// The caller of the current request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub ResolvedIdentity);

/// Resolves the caller from headers, environment or identity service and
/// rejects the request when none of them yields an e-mail address.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let headers = request.headers();
    let identity = state
        .identity
        .resolve(|name: &str| headers.get(name).and_then(|value| value.to_str().ok()))
        .await
        .ok_or(Error::Unauthenticated)?;

    request.extensions_mut().insert(CurrentUser(identity));
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(Error::Unauthenticated)
    }
}
