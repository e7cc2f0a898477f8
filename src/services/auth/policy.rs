//! Authorization policy: an ordered rule table.
//!
//! Each rule is (method matcher, path pattern, requirement). Rules are
//! evaluated top to bottom and the first match decides, so specific rules
//! must come before general ones. A request that matches no rule requires an
//! authenticated principal.
//!
//! Path patterns split on `/`: `**` matches zero or more segments, `*`
//! exactly one, anything else itself. `/api/v1/libros/**` therefore covers
//! both `/api/v1/libros` and `/api/v1/libros/7`.

use axum::http::Method;

use crate::repos::user_repo::{Role, RoleSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodMatcher {
    Any,
    Only(Vec<Method>),
}

impl MethodMatcher {
    pub fn only(methods: impl IntoIterator<Item = Method>) -> Self {
        Self::Only(methods.into_iter().collect())
    }

    fn matches(&self, method: &Method) -> bool {
        match self {
            Self::Any => true,
            Self::Only(methods) => methods.contains(method),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Single,
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|s| match s {
                "**" => Segment::Rest,
                "*" => Segment::Single,
                literal => Segment::Literal(literal.to_string()),
            })
            .collect();
        Self { segments }
    }

    pub fn matches(&self, path: &str) -> bool {
        let path: Vec<&str> = split_path(path).collect();
        match_segments(&self.segments, &path)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::Rest, rest)) => {
            (0..=path.len()).any(|skip| path.get(skip..).is_some_and(|p| match_segments(rest, p)))
        }
        Some((Segment::Single, rest)) => match path.split_first() {
            Some((_, tail)) => match_segments(rest, tail),
            None => false,
        },
        Some((Segment::Literal(expected), rest)) => match path.split_first() {
            Some((actual, tail)) => *actual == expected.as_str() && match_segments(rest, tail),
            None => false,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    PermitAll,
    Authenticated,
    // satisfied by holding at least one of the roles
    AnyRole(RoleSet),
}

impl Requirement {
    pub fn any_role(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::AnyRole(roles.into_iter().collect())
    }

    /// `principal_roles` is `None` when the request carries no valid principal.
    fn check(&self, principal_roles: Option<&RoleSet>) -> Decision {
        match (self, principal_roles) {
            (Self::PermitAll, _) => Decision::Allow,
            (_, None) => Decision::Unauthenticated,
            (Self::Authenticated, Some(_)) => Decision::Allow,
            (Self::AnyRole(required), Some(held)) => {
                if required.iter().any(|r| held.contains(r)) {
                    Decision::Allow
                } else {
                    Decision::Forbidden
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    // 401: no principal, rule needs one
    Unauthenticated,
    // 403: principal lacks the required role
    Forbidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub method: MethodMatcher,
    pub pattern: PathPattern,
    pub requirement: Requirement,
}

impl Rule {
    pub fn new(method: MethodMatcher, pattern: &str, requirement: Requirement) -> Self {
        Self {
            method,
            pattern: PathPattern::new(pattern),
            requirement,
        }
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.matches(method) && self.pattern.matches(path)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: Vec<Rule>,
}

impl AccessPolicy {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The rule table this service runs with.
    pub fn standard() -> Self {
        let readers = || Requirement::any_role([Role::User, Role::Admin]);
        let admin = || Requirement::any_role([Role::Admin]);
        let writes = || MethodMatcher::only([Method::POST, Method::PUT, Method::DELETE]);

        Self::new(vec![
            // CORS preflight
            Rule::new(
                MethodMatcher::only([Method::OPTIONS]),
                "/**",
                Requirement::PermitAll,
            ),
            Rule::new(MethodMatcher::Any, "/health", Requirement::PermitAll),
            Rule::new(MethodMatcher::Any, "/api/v1/auth/**", Requirement::PermitAll),
            Rule::new(MethodMatcher::only([Method::GET]), "/api/v1/libros/**", readers()),
            Rule::new(writes(), "/api/v1/libros/**", admin()),
            Rule::new(MethodMatcher::only([Method::GET]), "/api/v1/comidas/**", readers()),
            Rule::new(writes(), "/api/v1/comidas/**", admin()),
            Rule::new(MethodMatcher::Any, "/api/v1/users/**", admin()),
            Rule::new(MethodMatcher::Any, "/**", Requirement::Authenticated),
        ])
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn evaluate(&self, method: &Method, path: &str, principal_roles: Option<&RoleSet>) -> Decision {
        match self.rules.iter().find(|rule| rule.matches(method, path)) {
            Some(rule) => rule.requirement.check(principal_roles),
            None => Requirement::Authenticated.check(principal_roles),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(rs: &[Role]) -> RoleSet {
        rs.iter().copied().collect()
    }

    #[test]
    fn double_star_matches_zero_or_more_segments() {
        let p = PathPattern::new("/api/v1/libros/**");
        assert!(p.matches("/api/v1/libros"));
        assert!(p.matches("/api/v1/libros/"));
        assert!(p.matches("/api/v1/libros/3"));
        assert!(p.matches("/api/v1/libros/3/extra"));
        assert!(!p.matches("/api/v1/librosx"));
        assert!(!p.matches("/api/v1/comidas/3"));
        assert!(!p.matches("/api/v1"));
    }

    #[test]
    fn single_star_matches_exactly_one_segment() {
        let p = PathPattern::new("/api/*/users");
        assert!(p.matches("/api/v1/users"));
        assert!(!p.matches("/api/users"));
        assert!(!p.matches("/api/v1/v2/users"));
    }

    #[test]
    fn double_star_in_the_middle_backtracks() {
        let p = PathPattern::new("/a/**/z");
        assert!(p.matches("/a/z"));
        assert!(p.matches("/a/b/c/z"));
        assert!(!p.matches("/a/b/c"));
    }

    #[test]
    fn root_catch_all_matches_everything() {
        let p = PathPattern::new("/**");
        assert!(p.matches("/"));
        assert!(p.matches("/anything/at/all"));
    }

    #[test]
    fn first_matching_rule_wins() {
        let policy = AccessPolicy::new(vec![
            Rule::new(MethodMatcher::Any, "/open/**", Requirement::PermitAll),
            Rule::new(MethodMatcher::Any, "/**", Requirement::Authenticated),
        ]);
        assert_eq!(policy.evaluate(&Method::GET, "/open/x", None), Decision::Allow);
        assert_eq!(
            policy.evaluate(&Method::GET, "/closed", None),
            Decision::Unauthenticated
        );

        let reversed = AccessPolicy::new(policy.rules().iter().rev().cloned().collect());
        assert_eq!(
            reversed.evaluate(&Method::GET, "/open/x", None),
            Decision::Unauthenticated
        );
    }

    #[test]
    fn unmatched_requests_require_authentication() {
        let policy = AccessPolicy::default();
        assert_eq!(policy.evaluate(&Method::GET, "/x", None), Decision::Unauthenticated);
        assert_eq!(
            policy.evaluate(&Method::GET, "/x", Some(&roles(&[Role::User]))),
            Decision::Allow
        );
    }

    #[test]
    fn options_is_always_allowed() {
        let policy = AccessPolicy::standard();
        for path in ["/", "/api/v1/users", "/api/v1/libros/1", "/nope"] {
            assert_eq!(policy.evaluate(&Method::OPTIONS, path, None), Decision::Allow);
            assert_eq!(
                policy.evaluate(&Method::OPTIONS, path, Some(&roles(&[Role::User]))),
                Decision::Allow
            );
        }
    }

    #[test]
    fn auth_and_health_are_public() {
        let policy = AccessPolicy::standard();
        assert_eq!(
            policy.evaluate(&Method::POST, "/api/v1/auth/signin", None),
            Decision::Allow
        );
        assert_eq!(policy.evaluate(&Method::GET, "/health", None), Decision::Allow);
    }

    #[test]
    fn resource_reads_need_user_or_admin() {
        let policy = AccessPolicy::standard();
        for path in ["/api/v1/libros", "/api/v1/comidas/4"] {
            assert_eq!(policy.evaluate(&Method::GET, path, None), Decision::Unauthenticated);
            assert_eq!(
                policy.evaluate(&Method::GET, path, Some(&roles(&[Role::User]))),
                Decision::Allow
            );
            assert_eq!(
                policy.evaluate(&Method::GET, path, Some(&roles(&[Role::Admin]))),
                Decision::Allow
            );
        }
    }

    #[test]
    fn resource_writes_need_admin() {
        let policy = AccessPolicy::standard();
        for method in [Method::POST, Method::PUT, Method::DELETE] {
            assert_eq!(
                policy.evaluate(&method, "/api/v1/libros/1", Some(&roles(&[Role::User]))),
                Decision::Forbidden
            );
            assert_eq!(
                policy.evaluate(&method, "/api/v1/comidas", Some(&roles(&[Role::Admin]))),
                Decision::Allow
            );
            assert_eq!(
                policy.evaluate(&method, "/api/v1/comidas", None),
                Decision::Unauthenticated
            );
        }
    }

    #[test]
    fn patch_on_resources_falls_through_to_authenticated() {
        let policy = AccessPolicy::standard();
        assert_eq!(
            policy.evaluate(&Method::PATCH, "/api/v1/libros/1", Some(&roles(&[Role::User]))),
            Decision::Allow
        );
        assert_eq!(
            policy.evaluate(&Method::PATCH, "/api/v1/libros/1", None),
            Decision::Unauthenticated
        );
    }

    #[test]
    fn users_area_is_admin_only() {
        let policy = AccessPolicy::standard();
        assert_eq!(
            policy.evaluate(&Method::GET, "/api/v1/users", Some(&roles(&[Role::User]))),
            Decision::Forbidden
        );
        assert_eq!(
            policy.evaluate(
                &Method::PUT,
                "/api/v1/users/9/roles",
                Some(&roles(&[Role::Admin]))
            ),
            Decision::Allow
        );
    }

    #[test]
    fn everything_else_needs_any_principal() {
        let policy = AccessPolicy::standard();
        assert_eq!(
            policy.evaluate(&Method::GET, "/api/v1/resources", None),
            Decision::Unauthenticated
        );
        assert_eq!(
            policy.evaluate(&Method::GET, "/api/v1/resources", Some(&roles(&[Role::User]))),
            Decision::Allow
        );
    }
}
