//! Page-level access rules applied before any page route is reached

use crate::value_objects::PlatformRole;

/// Pages that require a session
pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard", "/onboarding", "/settings", "/admin"];

/// Pages that only make sense without a session
pub const AUTH_PAGES: &[&str] = &["/login", "/register"];

/// Pages restricted to specific platform roles. More specific prefixes first.
pub const ROLE_GATED_PREFIXES: &[(&str, &[PlatformRole])] = &[
    ("/dashboard/creator", &[PlatformRole::Creator, PlatformRole::Admin]),
    ("/admin", &[PlatformRole::Admin]),
];

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const ACCESS_DENIED_PATH: &str = "/dashboard?error=access_denied";

/// Outcome of routing a request through the access rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Pass the request through untouched
    Continue,
    /// Send the visitor to the login page, returning to `next` afterwards
    RedirectToLogin { next: String },
    /// Signed-in visitor hit a login/register page
    RedirectToDashboard,
    /// The caller's platform role must be one of these
    RequireRole(&'static [PlatformRole]),
}

/// Segment-aware prefix match: `/dashboard` matches `/dashboard/x` but not `/dashboards`
pub fn path_has_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Apply the access rules in order for a request path
pub fn decide(path: &str, authenticated: bool) -> AccessDecision {
    if !authenticated {
        if PROTECTED_PREFIXES.iter().any(|p| path_has_prefix(path, p)) {
            return AccessDecision::RedirectToLogin {
                next: path.to_string(),
            };
        }
        return AccessDecision::Continue;
    }

    if AUTH_PAGES.iter().any(|p| path_has_prefix(path, p)) {
        return AccessDecision::RedirectToDashboard;
    }

    ROLE_GATED_PREFIXES
        .iter()
        .find(|(prefix, _)| path_has_prefix(path, prefix))
        .map_or(AccessDecision::Continue, |(_, roles)| {
            AccessDecision::RequireRole(roles)
        })
}

/// Login URL that returns to `next` after signing in. `next` is
/// form-encoded so `&`, `#` and `?` survive the round trip.
pub fn login_redirect(next: &str) -> String {
    let next: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("{LOGIN_PATH}?next={next}")
}

/// Only same-site relative paths are acceptable redirect targets
pub fn is_safe_redirect(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching_respects_segments() {
        assert!(path_has_prefix("/dashboard", "/dashboard"));
        assert!(path_has_prefix("/dashboard/courses", "/dashboard"));
        assert!(!path_has_prefix("/dashboards", "/dashboard"));
    }

    #[test]
    fn test_anonymous_visitor_on_protected_page() {
        assert_eq!(
            decide("/settings/profile", false),
            AccessDecision::RedirectToLogin {
                next: "/settings/profile".to_string()
            }
        );
        assert_eq!(decide("/courses/abc", false), AccessDecision::Continue);
        assert_eq!(decide("/login", false), AccessDecision::Continue);
    }

    #[test]
    fn test_signed_in_visitor_on_auth_page() {
        assert_eq!(decide("/login", true), AccessDecision::RedirectToDashboard);
        assert_eq!(decide("/register", true), AccessDecision::RedirectToDashboard);
    }

    #[test]
    fn test_role_gated_pages() {
        assert_eq!(
            decide("/admin/users", true),
            AccessDecision::RequireRole(&[PlatformRole::Admin])
        );
        assert_eq!(
            decide("/dashboard/creator", true),
            AccessDecision::RequireRole(&[PlatformRole::Creator, PlatformRole::Admin])
        );
        assert_eq!(decide("/dashboard", true), AccessDecision::Continue);
    }

    #[test]
    fn test_safe_redirects() {
        assert!(is_safe_redirect("/courses/1"));
        assert!(!is_safe_redirect("//evil.example"));
        assert!(!is_safe_redirect("https://evil.example"));
        assert!(!is_safe_redirect("/\\evil.example"));
    }

    #[test]
    fn test_login_redirect() {
        assert_eq!(login_redirect("/invite/abc"), "/login?next=%2Finvite%2Fabc");
    }

    #[test]
    fn test_login_redirect_keeps_query_and_fragment_inside_next() {
        let location = login_redirect("/courses/42?tab=lessons&page=2#intro");
        assert_eq!(
            location,
            "/login?next=%2Fcourses%2F42%3Ftab%3Dlessons%26page%3D2%23intro"
        );

        let query = location.split_once('?').unwrap().1;
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(
            pairs,
            [(
                "next".to_string(),
                "/courses/42?tab=lessons&page=2#intro".to_string()
            )]
        );
    }
}
