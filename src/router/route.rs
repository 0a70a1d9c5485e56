use once_cell::sync::Lazy;
use regex::Regex;

use crate::identity::Role;

/// What a route does once matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// A page the user can land on.
    View,
    /// Immediately forwards to another path.
    Redirect(&'static str),
}

/// Static description of one route. `pattern` uses `:name` segments for parameters and
/// `*` alone for the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub name: &'static str,
    pub pattern: &'static str,
    pub requires_auth: bool,
    pub allowed_roles: &'static [Role],
    pub kind: RouteKind,
}

impl RouteDescriptor {
    pub const fn public(name: &'static str, pattern: &'static str) -> Self {
        Self { name, pattern, requires_auth: false, allowed_roles: &[], kind: RouteKind::View }
    }

    pub const fn guarded(name: &'static str, pattern: &'static str, allowed_roles: &'static [Role]) -> Self {
        Self { name, pattern, requires_auth: true, allowed_roles, kind: RouteKind::View }
    }

    pub const fn redirect(name: &'static str, pattern: &'static str, to: &'static str) -> Self {
        Self { name, pattern, requires_auth: false, allowed_roles: &[], kind: RouteKind::Redirect(to) }
    }

    pub fn is_catch_all(&self) -> bool { self.pattern == CATCH_ALL }

    /// Membership in `allowed_roles`. An empty list admits no role.
    pub fn admits(&self, role: Role) -> bool { self.allowed_roles.contains(&role) }
}

pub const CATCH_ALL: &str = "*";

static SEGMENT_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:([A-Za-z_][A-Za-z0-9_]*)$").unwrap());

/// A descriptor with its pattern compiled. Matching is exact and case-sensitive.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub descriptor: RouteDescriptor,
    matcher: Regex,
    params: Vec<String>,
}

impl CompiledRoute {
    pub fn compile(descriptor: RouteDescriptor) -> Result<Self, regex::Error> {
        if descriptor.is_catch_all() {
            return Ok(Self { descriptor, matcher: Regex::new(r"^.*$")?, params: Vec::new() });
        }
        let mut expr = String::from("^");
        let mut params = Vec::new();
        for segment in descriptor.pattern.split('/').filter(|s| !s.is_empty()) {
            expr.push('/');
            match SEGMENT_PARAM.captures(segment) {
                Some(c) => {
                    params.push(c[1].to_string());
                    expr.push_str("([^/]+)");
                }
                None => expr.push_str(&regex::escape(segment)),
            }
        }
        if expr == "^" { expr.push('/'); }
        expr.push('$');
        Ok(Self { descriptor, matcher: Regex::new(&expr)?, params })
    }

    /// Parameter values (percent-decoded) when `path` matches.
    pub fn matches(&self, path: &str) -> Option<Vec<(String, String)>> {
        let caps = self.matcher.captures(path)?;
        let values = self
            .params
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let raw = caps.get(i + 1).map(|m| m.as_str()).unwrap_or_default();
                let value = urlencoding::decode(raw).map(|v| v.into_owned()).unwrap_or_else(|_| raw.to_string());
                (name.clone(), value)
            })
            .collect();
        Some(values)
    }
}

/// Strip query and fragment, leaving the path a route is matched against.
pub fn path_only(target: &str) -> &str {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    &target[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_and_param_segments() {
        let r = CompiledRoute::compile(RouteDescriptor::guarded("book", "/book/:id", &[])).unwrap();
        assert_eq!(r.matches("/book/42"), Some(vec![("id".to_string(), "42".to_string())]));
        assert!(r.matches("/book").is_none());
        assert!(r.matches("/book/42/x").is_none());
        assert!(r.matches("/Book/42").is_none());
    }

    #[test]
    fn params_are_decoded() {
        let r = CompiledRoute::compile(RouteDescriptor::guarded("d", "/seller/detail/:name", &[])).unwrap();
        assert_eq!(r.matches("/seller/detail/%E5%BC%A0%E4%B8%89").unwrap()[0].1, "张三");
    }

    #[test]
    fn root_and_catch_all() {
        let root = CompiledRoute::compile(RouteDescriptor::redirect("root", "/", "/login")).unwrap();
        assert!(root.matches("/").is_some());
        assert!(root.matches("/x").is_none());
        let all = CompiledRoute::compile(RouteDescriptor::redirect("nf", CATCH_ALL, "/login")).unwrap();
        assert!(all.matches("/anything/at/all").is_some());
    }

    #[test]
    fn strips_query_and_hash() {
        assert_eq!(path_only("/buyer/home?tab=1#top"), "/buyer/home");
        assert_eq!(path_only("/chat#x"), "/chat");
        assert_eq!(path_only("/login"), "/login");
    }

    #[test]
    fn empty_role_list_admits_no_role() {
        let locked = RouteDescriptor::guarded("x", "/x", &[]);
        assert!(Role::ALL.iter().all(|r| !locked.admits(*r)));
        let admin = RouteDescriptor::guarded("y", "/y", &[Role::Admin]);
        assert!(!admin.admits(Role::Buyer));
    }
}
