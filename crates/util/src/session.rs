//! Current-user session accessor.
//!
//! The components never own authentication; they only ask whether someone is
//! signed in, whether their email is verified, and who they are.

use serde::{Deserialize, Serialize};

/// Read access to the signed-in user.
pub trait CurrentUser: Send + Sync {
    fn is_logged_in(&self) -> bool;
    fn is_email_verified(&self) -> bool;
    /// `None` when nobody is signed in.
    fn user_id(&self) -> Option<u64>;
}

/// Fixed session values, typically read from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub user_id: Option<u64>,
}

impl SessionSnapshot {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user_id: u64, email_verified: bool) -> Self {
        Self {
            logged_in: true,
            email_verified,
            user_id: Some(user_id),
        }
    }
}

impl CurrentUser for SessionSnapshot {
    fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    fn is_email_verified(&self) -> bool {
        self.logged_in && self.email_verified
    }

    fn user_id(&self) -> Option<u64> {
        if self.logged_in { self.user_id } else { None }
    }
}
