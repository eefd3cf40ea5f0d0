//! Route gating extractors built on [`AuthGate`].

use std::future::{Ready, ready};
use std::sync::{Arc, Mutex, PoisonError};

use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};
use quill_core::auth::AuthGate;
use quill_core::domain::{AuthState, Route, UserProfile};
use quill_core::ports::Navigator;
use thiserror::Error;

use super::error::AppError;
use crate::state::AppState;

/// Navigator for a single request: remembers where it was sent.
#[derive(Default)]
pub struct RedirectNavigator {
    target: Mutex<Option<Route>>,
}

impl RedirectNavigator {
    pub fn take(&self) -> Option<Route> {
        self.target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Navigator for RedirectNavigator {
    fn navigate(&self, route: Route) {
        *self.target.lock().unwrap_or_else(PoisonError::into_inner) = Some(route);
    }
}

/// `303 See Other` to a route.
pub fn see_other(route: Route) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, route.path()))
        .finish()
}

/// A gate refused the request and navigated elsewhere.
#[derive(Debug, Error)]
#[error("Redirecting to {}", .0.path())]
pub struct GateRedirect(pub Route);

impl ResponseError for GateRedirect {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        see_other(self.0)
    }
}

/// Mount a gate for this request and report where it navigated, if anywhere.
fn guard(req: &HttpRequest, required: bool) -> Result<AuthState, actix_web::Error> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AppError::Internal("Server configuration error".to_string()).into());
    };

    let navigator = Arc::new(RedirectNavigator::default());
    let gate = AuthGate::mount(Arc::clone(&state.auth), required, navigator.clone());
    let snapshot = state.auth.snapshot();
    gate.unmount();

    match navigator.take() {
        Some(route) => Err(GateRedirect(route).into()),
        None => Ok(snapshot),
    }
}

/// Extractor for routes that need a signed-in user.
///
/// ```ignore
/// async fn me(Protected(user): Protected) -> impl Responder {
///     format!("Hello, {}!", user.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Protected(pub UserProfile);

impl FromRequest for Protected {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(guard(req, true).and_then(|state| {
            state
                .user_data
                .map(Protected)
                .ok_or_else(|| GateRedirect(Route::Login).into())
        }))
    }
}

/// Extractor for routes only shown to signed-out visitors, such as the login page.
#[derive(Debug, Clone, Copy)]
pub struct PublicOnly;

impl FromRequest for PublicOnly {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(guard(req, false).map(|_| PublicOnly))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigator_keeps_last_route_once() {
        let navigator = RedirectNavigator::default();
        assert_eq!(navigator.take(), None);

        navigator.navigate(Route::Login);
        assert_eq!(navigator.take(), Some(Route::Login));
        assert_eq!(navigator.take(), None);
    }

    #[test]
    fn test_see_other_sets_location() {
        let response = see_other(Route::Home);

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }
}
