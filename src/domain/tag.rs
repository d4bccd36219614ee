//! Image tag policy
//!
//! Pure function from registry settings, preview id and service name to the
//! image reference the deployer will pull.

use super::registry::{RegistryConfig, LOCAL_NAMESPACE};

/// Compute the destination image reference for a service
///
/// - `{host}/{username}/{image}:latest` when the registry is active with a username
/// - `{host}/{image}:latest` when the registry is active without one
/// - `previewcloud/{image}:latest` otherwise
///
/// `image` is `{preview_id}-{service_name}` lowercased. Callers must pass
/// non-empty ids and names.
pub fn compute_tag(registry: &RegistryConfig, preview_id: &str, service_name: &str) -> String {
    debug_assert!(!preview_id.is_empty(), "preview id must not be empty");
    debug_assert!(!service_name.is_empty(), "service name must not be empty");

    let image = format!("{}-{}", preview_id, service_name).to_lowercase();

    match (registry.is_active(), registry.username()) {
        (true, Some(username)) => format!(
            "{}/{}/{}:latest",
            registry.host_or_default(),
            username,
            image
        ),
        (true, None) => format!("{}/{}:latest", registry.host_or_default(), image),
        (false, _) => format!("{}/{}:latest", LOCAL_NAMESPACE, image),
    }
}
