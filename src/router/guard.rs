//! The navigation guard. A pure function of the session snapshot and the target route;
//! it never reads storage and never mutates anything, so evaluating it twice on the
//! same input gives the same decision.

use std::fmt;

use crate::identity::{Role, Session};

use super::route::RouteDescriptor;
use super::table::LOGIN;

/// Why a navigation was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// The route needs a session and there is none.
    NotAuthenticated,
    /// The session's role is not admitted by the route.
    RoleDenied(Role),
    /// A logged-in user asked for the login page.
    AlreadyAuthenticated(Role),
}

impl fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectReason::NotAuthenticated => write!(f, "please log in first"),
            RedirectReason::RoleDenied(r) => write!(f, "role '{}' may not open this page", r),
            RedirectReason::AlreadyAuthenticated(r) => write!(f, "already logged in as {}", r),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    Redirect { to: &'static str, reason: RedirectReason },
}

impl Decision {
    pub fn is_permit(&self) -> bool { matches!(self, Decision::Permit) }

    pub fn target(&self) -> Option<&'static str> {
        match self {
            Decision::Permit => None,
            Decision::Redirect { to, .. } => Some(*to),
        }
    }
}

/// Decide a navigation to `path` (already stripped of query and fragment), which
/// matched `route`.
///
/// A session holding a token but no recognised role passes role checks and may open
/// the login page; only a known role triggers the role redirects.
pub fn evaluate(session: &Session, route: &RouteDescriptor, path: &str) -> Decision {
    if route.requires_auth {
        if !session.is_authenticated() {
            return Decision::Redirect { to: LOGIN, reason: RedirectReason::NotAuthenticated };
        }
        if let Some(role) = session.role {
            if !route.admits(role) {
                return Decision::Redirect { to: role.home_route(), reason: RedirectReason::RoleDenied(role) };
            }
        }
    }
    if path == LOGIN && session.is_authenticated() {
        if let Some(role) = session.role {
            return Decision::Redirect { to: role.home_route(), reason: RedirectReason::AlreadyAuthenticated(role) };
        }
    }
    Decision::Permit
}
