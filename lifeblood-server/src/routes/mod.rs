use axum::{Json, Router, middleware, routing::get};
use lifeblood_api::ResolvedIdentity;

use crate::{
    middleware::{CurrentUser, identity_middleware},
    state::AppState,
};

pub mod inspection;

pub async fn me(CurrentUser(identity): CurrentUser) -> Json<ResolvedIdentity> {
    Json(identity)
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/me", get(me))
        .nest("/inspections", inspection::inspection_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .with_state(state)
}
