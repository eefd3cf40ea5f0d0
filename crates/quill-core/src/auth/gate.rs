//! Route guard driven by the authentication state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::{AuthStore, SubscriptionId};
use crate::domain::Route;
use crate::ports::Navigator;

/// Outcome of comparing a route's requirement with the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Render,
    Redirect(Route),
}

/// `required` is the route's declared requirement, `authenticated` the current status.
pub fn decide(required: bool, authenticated: bool) -> GateDecision {
    match (required, authenticated) {
        (true, false) => GateDecision::Redirect(Route::Login),
        (false, true) => GateDecision::Redirect(Route::Home),
        _ => GateDecision::Render,
    }
}

struct GateState {
    last_status: Option<bool>,
    decision: GateDecision,
}

struct GateInner {
    required: bool,
    navigator: Arc<dyn Navigator>,
    loading: AtomicBool,
    state: Mutex<GateState>,
}

impl GateInner {
    /// Re-evaluate only when the status actually changed.
    ///
    /// The status is read under the gate's lock, so a late notification
    /// carrying an older state cannot overwrite a newer decision.
    fn evaluate(&self, store: &AuthStore) {
        let (authenticated, decision) = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let authenticated = store.is_authenticated();
            if state.last_status == Some(authenticated) {
                return;
            }
            state.last_status = Some(authenticated);
            state.decision = decide(self.required, authenticated);
            (authenticated, state.decision)
        };

        // Navigate with the lock released: the navigator may touch the store.
        if let GateDecision::Redirect(route) = decision {
            tracing::debug!(
                required = self.required,
                authenticated,
                to = route.path(),
                "Auth gate redirecting"
            );
            self.navigator.navigate(route);
        }
        self.loading.store(false, Ordering::SeqCst);
    }
}

/// Guard for one mounted view.
///
/// Mounting subscribes to the store and then evaluates once; every later
/// status change is re-evaluated synchronously. Dropping the gate unsubscribes.
pub struct AuthGate {
    inner: Arc<GateInner>,
    store: Arc<AuthStore>,
    subscription: Option<SubscriptionId>,
}

impl AuthGate {
    pub fn mount(store: Arc<AuthStore>, required: bool, navigator: Arc<dyn Navigator>) -> Self {
        let inner = Arc::new(GateInner {
            required,
            navigator,
            loading: AtomicBool::new(true),
            state: Mutex::new(GateState {
                last_status: None,
                decision: GateDecision::Render,
            }),
        });

        let listener = Arc::clone(&inner);
        let weak_store = Arc::downgrade(&store);
        let subscription = store.subscribe(move |_| {
            if let Some(store) = weak_store.upgrade() {
                listener.evaluate(&store);
            }
        });
        inner.evaluate(&store);

        Self {
            inner,
            store,
            subscription: Some(subscription),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::SeqCst)
    }

    pub fn decision(&self) -> GateDecision {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .decision
    }

    /// True once evaluated and allowed to show its content.
    pub fn should_render(&self) -> bool {
        !self.is_loading() && self.decision() == GateDecision::Render
    }

    pub fn unmount(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.store.unsubscribe(id);
        }
    }
}

impl Drop for AuthGate {
    fn drop(&mut self) {
        self.detach();
    }
}
