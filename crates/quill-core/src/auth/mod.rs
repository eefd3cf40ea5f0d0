//! Authentication state, route gating and the sign-in/sign-out flows.

mod flow;
mod gate;
mod store;

pub use flow::{LoginError, LoginFlow, LogoutFlow, validate_credentials};
pub use gate::{AuthGate, GateDecision, decide};
pub use store::{AuthStore, SubscriptionId};
