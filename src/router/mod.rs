//! Client-side navigation: a static route table, the role guard, and a resolver that
//! follows redirects the way a browser router does (each redirect is a fresh
//! navigation that goes through the guard again).

pub mod guard;
pub mod route;
pub mod table;

use thiserror::Error;
use tracing::debug;

use crate::identity::{Session, SessionHandle};

pub use guard::{evaluate, Decision, RedirectReason};
pub use route::{path_only, CompiledRoute, RouteDescriptor, RouteKind};
pub use table::{DEFAULT_ROUTES, LOGIN};

/// Redirect chains longer than this are treated as a loop.
pub const MAX_HOPS: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("redirect loop while navigating to '{target}': {}", .chain.join(" -> "))]
    RedirectLoop { target: String, chain: Vec<String> },

    #[error("no route matches '{0}'")]
    NoMatch(String),

    #[error("invalid route pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// One redirect taken on the way to the final route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    pub from: String,
    pub to: String,
    /// `None` for static redirects (`/` and the catch-all).
    pub reason: Option<RedirectReason>,
}

/// Where a navigation ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: String,
    pub route: &'static str,
    pub params: Vec<(String, String)>,
    pub hops: Vec<Hop>,
}

impl Resolution {
    pub fn redirected(&self) -> bool { !self.hops.is_empty() }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<CompiledRoute>,
    session: SessionHandle,
}

impl Router {
    pub fn new(session: SessionHandle) -> Result<Self, NavigationError> {
        Self::with_routes(DEFAULT_ROUTES, session)
    }

    pub fn with_routes(descriptors: &[RouteDescriptor], session: SessionHandle) -> Result<Self, NavigationError> {
        let routes = descriptors
            .iter()
            .map(|d| {
                CompiledRoute::compile(*d).map_err(|e| NavigationError::InvalidPattern {
                    pattern: d.pattern.to_string(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { routes, session })
    }

    pub fn routes(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.iter().map(|r| &r.descriptor)
    }

    /// First route in table order matching `path`.
    pub fn match_path(&self, path: &str) -> Option<(&CompiledRoute, Vec<(String, String)>)> {
        self.routes.iter().find_map(|r| r.matches(path).map(|p| (r, p)))
    }

    /// Resolve against the live session.
    pub fn resolve(&self, target: &str) -> Result<Resolution, NavigationError> {
        resolve_with(&self.routes, &self.session.snapshot(), target)
    }

    /// Resolve against an explicit session snapshot.
    pub fn resolve_as(&self, session: &Session, target: &str) -> Result<Resolution, NavigationError> {
        resolve_with(&self.routes, session, target)
    }
}

fn resolve_with(routes: &[CompiledRoute], session: &Session, target: &str) -> Result<Resolution, NavigationError> {
    let mut current = path_only(target).to_string();
    let mut hops: Vec<Hop> = Vec::new();
    loop {
        let (route, params) = routes
            .iter()
            .find_map(|r| r.matches(&current).map(|p| (r, p)))
            .ok_or_else(|| NavigationError::NoMatch(current.clone()))?;
        let (next, reason) = match route.descriptor.kind {
            RouteKind::Redirect(to) => (to, None),
            RouteKind::View => match evaluate(session, &route.descriptor, &current) {
                Decision::Permit => {
                    debug!(target: "bookpal::router", "{} -> {} ({} hops)", target, route.descriptor.name, hops.len());
                    return Ok(Resolution { path: current, route: route.descriptor.name, params, hops });
                }
                Decision::Redirect { to, reason } => (to, Some(reason)),
            },
        };
        if hops.len() >= MAX_HOPS {
            let mut chain: Vec<String> = hops.iter().map(|h| h.from.clone()).collect();
            chain.push(current);
            return Err(NavigationError::RedirectLoop { target: target.to_string(), chain });
        }
        hops.push(Hop { from: current.clone(), to: next.to_string(), reason });
        current = next.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Role;

    fn router() -> Router { Router::new(SessionHandle::in_memory()).unwrap() }

    #[test]
    fn root_and_unknown_paths_land_on_login() {
        let r = router();
        let res = r.resolve("/").unwrap();
        assert_eq!(res.path, LOGIN);
        assert_eq!(res.route, "Login");
        assert_eq!(res.hops.len(), 1);
        assert_eq!(r.resolve("/no/such/page").unwrap().path, LOGIN);
        // case-sensitive: /Login is unknown
        assert_eq!(r.resolve("/Login").unwrap().hops[0].from, "/Login");
    }

    #[test]
    fn logged_in_root_goes_all_the_way_home() {
        let r = router();
        let s = Session::new("abc", Some(Role::Admin));
        let res = r.resolve_as(&s, "/").unwrap();
        assert_eq!(res.path, "/admin/dashboard");
        let chain: Vec<&str> = res.hops.iter().map(|h| h.to.as_str()).collect();
        assert_eq!(chain, vec![LOGIN, "/admin/dashboard"]);
        assert_eq!(res.hops[1].reason, Some(RedirectReason::AlreadyAuthenticated(Role::Admin)));
    }

    #[test]
    fn params_and_query_are_handled() {
        let r = router();
        let s = Session::new("abc", Some(Role::Buyer));
        let res = r.resolve_as(&s, "/book/17?from=home#reviews").unwrap();
        assert_eq!(res.route, "BookDetail");
        assert_eq!(res.param("id"), Some("17"));
        assert!(!res.redirected());
    }

    #[test]
    fn live_session_changes_are_seen() {
        let handle = SessionHandle::in_memory();
        let r = Router::new(handle.clone()).unwrap();
        assert_eq!(r.resolve("/publish").unwrap().path, LOGIN);
        handle.establish(Session::new("abc", Some(Role::Seller))).unwrap();
        assert_eq!(r.resolve("/publish").unwrap().path, "/publish");
    }

    #[test]
    fn loops_are_reported() {
        const LOOPY: &[RouteDescriptor] = &[
            RouteDescriptor::redirect("A", "/a", "/b"),
            RouteDescriptor::redirect("B", "/b", "/a"),
        ];
        let r = Router::with_routes(LOOPY, SessionHandle::in_memory()).unwrap();
        match r.resolve("/a") {
            Err(NavigationError::RedirectLoop { chain, .. }) => assert_eq!(chain.len(), MAX_HOPS + 1),
            other => panic!("expected loop, got {:?}", other),
        }
        assert_eq!(r.resolve("/c"), Err(NavigationError::NoMatch("/c".into())));
    }

    #[test]
    fn default_table_never_loops() {
        let r = router();
        let mut sessions = vec![Session::anonymous(), Session::new("t", None)];
        sessions.extend(Role::ALL.iter().map(|role| Session::new("t", Some(*role))));
        for s in &sessions {
            for d in DEFAULT_ROUTES {
                let path = d.pattern.replace(":name", "alice").replace(":id", "1").replace('*', "/zzz");
                assert!(r.resolve_as(s, &path).is_ok(), "{} as {:?}", path, s);
            }
        }
    }
}
