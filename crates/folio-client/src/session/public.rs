//! Public endpoint allowlist.

/// Path fragments reachable without credentials.
pub const DEFAULT_PUBLIC_ENDPOINTS: &[&str] = &[
    "/auth/login",
    "/auth/register",
    "/auth/forgot-password",
    "/auth/reset-password",
    "/auth/verify-email",
    "/journals/public",
    "/categories/public",
    "/tags/public",
];

/// Substring allowlist of public paths.
///
/// A request whose path contains any fragment is sent without forced
/// credentials and never triggers session renewal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicEndpoints {
    fragments: Vec<String>,
}

impl Default for PublicEndpoints {
    fn default() -> Self {
        Self {
            fragments: DEFAULT_PUBLIC_ENDPOINTS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

impl PublicEndpoints {
    /// The built-in allowlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in allowlist plus `extra` fragments.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut endpoints = Self::default();
        for fragment in extra {
            endpoints.add(fragment);
        }
        endpoints
    }

    /// Add a fragment. Empty and duplicate fragments are ignored; an empty
    /// fragment would otherwise match every path.
    pub fn add(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        let fragment = fragment.trim();
        if fragment.is_empty() || self.fragments.iter().any(|f| f == fragment) {
            return;
        }
        self.fragments.push(fragment.to_string());
    }

    /// Whether `path` contains any allowlisted fragment.
    pub fn is_public(&self, path: &str) -> bool {
        self.fragments.iter().any(|f| path.contains(f.as_str()))
    }

    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_fragments_match() {
        let public = PublicEndpoints::new();
        assert!(public.is_public("/auth/login"));
        assert!(public.is_public("/auth/register"));
        assert!(public.is_public("/journals/public?search=rust&page=2"));
        assert!(public.is_public("/api/categories/public"));
    }

    #[test]
    fn test_private_paths_do_not_match() {
        let public = PublicEndpoints::new();
        assert!(!public.is_public("/journals/my-journals"));
        assert!(!public.is_public("/auth/refresh-token"));
        assert!(!public.is_public("/auth/me"));
        assert!(!public.is_public("/cart"));
    }

    #[test]
    fn test_extra_fragments() {
        let public = PublicEndpoints::with_extra(["/announcements", "", "  ", "/auth/login"]);
        assert!(public.is_public("/announcements/latest"));
        assert!(!public.is_public("/journals/42"));
        assert_eq!(
            public.fragments().count(),
            DEFAULT_PUBLIC_ENDPOINTS.len() + 1
        );
    }
}
