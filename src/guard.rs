//! Route guard for protected views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected view applies the same decision: unauthenticated users go
//! to login (remembering where they were headed), users lacking the view's
//! role go home without a message. The guard only reads session state.

use crate::session::{Role, SessionState};
use crate::ui::Redirect;

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Redirect),
}

impl GuardDecision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Decide whether `state` may render a view at `intended` requiring `required_role`.
#[must_use]
pub fn check_access(state: &SessionState, required_role: Option<Role>, intended: &str) -> GuardDecision {
    let (Some(user), Some(_)) = (&state.user, &state.token) else {
        return GuardDecision::Redirect(Redirect::Login { from: Some(intended.to_owned()) });
    };

    if let Some(required) = required_role {
        if !user.role.satisfies(required) {
            return GuardDecision::Redirect(Redirect::Home);
        }
    }

    GuardDecision::Allow
}
