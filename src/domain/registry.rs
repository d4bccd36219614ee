//! Registry domain types

use std::fmt;

/// Registry used when a username is given without a host
pub const DEFAULT_REGISTRY: &str = "docker.io";

/// Image namespace for images that stay on the local daemon
pub const LOCAL_NAMESPACE: &str = "previewcloud";

/// Destination registry for preview images
///
/// A registry is active when a host is set or a username is set.
/// Empty strings are treated as unset.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    host: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl RegistryConfig {
    pub fn new(host: Option<String>, username: Option<String>, password: Option<String>) -> Self {
        Self {
            host: non_empty(host),
            username: non_empty(username),
            password: non_empty(password),
        }
    }

    /// A registry that keeps images local
    pub fn local() -> Self {
        Self::default()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Whether images are pushed to a registry
    pub fn is_active(&self) -> bool {
        self.host.is_some() || self.username.is_some()
    }

    /// Configured host, or the default registry
    pub fn host_or_default(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_REGISTRY)
    }

    /// Username and password, only when a login should happen
    pub fn login_credentials(&self) -> Option<(&str, &str)> {
        if !self.is_active() {
            return None;
        }
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(password)) => Some((user, password)),
            _ => None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_by_default() {
        let registry = RegistryConfig::local();
        assert!(!registry.is_active());
        assert_eq!(registry.host_or_default(), DEFAULT_REGISTRY);
        assert!(registry.login_credentials().is_none());
    }

    #[test]
    fn test_username_alone_activates_registry() {
        let registry = RegistryConfig::new(None, Some("alice".into()), None);
        assert!(registry.is_active());
        assert!(registry.login_credentials().is_none());
    }

    #[test]
    fn test_password_without_username_never_logs_in() {
        let registry =
            RegistryConfig::new(Some("ghcr.io".into()), None, Some("secret".into()));
        assert!(registry.is_active());
        assert!(registry.login_credentials().is_none());
    }

    #[test]
    fn test_login_credentials() {
        let registry = RegistryConfig::new(None, Some("alice".into()), Some("secret".into()));
        assert_eq!(registry.login_credentials(), Some(("alice", "secret")));
    }

    #[test]
    fn test_empty_strings_are_unset() {
        let registry = RegistryConfig::new(Some("".into()), Some("  ".into()), None);
        assert!(!registry.is_active());
    }

    #[test]
    fn test_blank_host_never_produces_a_hostless_tag() {
        let registry = RegistryConfig::new(Some(" ".into()), Some("alice".into()), None);
        assert_eq!(registry.host(), None);
        assert_eq!(registry.host_or_default(), DEFAULT_REGISTRY);
        assert_eq!(
            crate::domain::compute_tag(&registry, "pr-1", "x"),
            "docker.io/alice/pr-1-x:latest"
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let registry = RegistryConfig::new(None, Some("alice".into()), Some("hunter2".into()));
        let debug = format!("{:?}", registry);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("alice"));
    }
}
