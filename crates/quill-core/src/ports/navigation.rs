use crate::domain::Route;

/// Imperative navigation, driven by the auth gate and the login/logout flows.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
