use serde::{Deserialize, Serialize};

use super::UserProfile;

/// Authentication status shared by every view that needs to know who is signed in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    pub status: bool,
    pub user_data: Option<UserProfile>,
}

impl AuthState {
    pub fn signed_in(profile: UserProfile) -> Self {
        Self {
            status: true,
            user_data: Some(profile),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_data.as_ref().map(|u| u.id.as_str())
    }
}

/// Logical navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
        }
    }
}
