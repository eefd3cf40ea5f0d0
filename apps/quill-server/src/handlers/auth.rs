//! Session handlers: login page, login, logout and the current profile.

use std::sync::Arc;

use actix_web::{HttpResponse, web};

use quill_core::auth::{LoginFlow, LogoutFlow};
use quill_core::domain::{Credentials, Route, UserProfile};
use quill_shared::dto::{LoginFormResponse, LoginRequest, UserResponse};

use crate::middleware::error::AppResult;
use crate::middleware::gate::{Protected, PublicOnly, RedirectNavigator, see_other};
use crate::state::AppState;

fn user_response(profile: UserProfile) -> UserResponse {
    UserResponse {
        id: profile.id,
        name: profile.name,
        email: profile.email,
        email_verified: profile.email_verified,
        registered_at: profile.registered_at.to_rfc3339(),
    }
}

/// GET /login
pub async fn login_form(_: PublicOnly) -> HttpResponse {
    HttpResponse::Ok().json(LoginFormResponse {
        action: Route::Login.path().to_string(),
        method: "POST".to_string(),
        fields: vec!["email".to_string(), "password".to_string()],
    })
}

/// POST /login
pub async fn login(
    _: PublicOnly,
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let navigator = Arc::new(RedirectNavigator::default());
    let flow = LoginFlow::new(
        Arc::clone(&state.account),
        Arc::clone(&state.auth),
        navigator.clone(),
    );

    flow.submit(Credentials::new(req.email, req.password)).await?;

    Ok(see_other(navigator.take().unwrap_or(Route::Home)))
}

/// POST /logout
pub async fn logout(_: Protected, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let navigator = Arc::new(RedirectNavigator::default());
    let flow = LogoutFlow::new(
        Arc::clone(&state.account),
        Arc::clone(&state.auth),
        navigator.clone(),
    );

    flow.submit().await?;

    Ok(see_other(navigator.take().unwrap_or(Route::Login)))
}

/// GET /me
pub async fn me(Protected(user): Protected) -> HttpResponse {
    HttpResponse::Ok().json(user_response(user))
}
