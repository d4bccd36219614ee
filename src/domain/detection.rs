//! Build system detection
//!
//! Classifies a build context by marker files. Checks run in a fixed
//! priority order: Node, then Python, then Go.

/// Directory the container build copies into the image
pub const ARTIFACT_DIR: &str = "build";

/// Extra marker that makes a Python project run a packaging build
pub const PYTHON_PACKAGING_MARKER: &str = "setup.py";

/// Build system signature of a context directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSignature {
    NodeProject,
    PythonProject,
    GoProject,
    Unknown,
}

impl DetectionSignature {
    /// Signatures with a marker, highest priority first
    pub const PRIORITY: [DetectionSignature; 3] = [
        DetectionSignature::NodeProject,
        DetectionSignature::PythonProject,
        DetectionSignature::GoProject,
    ];

    /// Marker file that identifies this signature
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            Self::NodeProject => Some("package.json"),
            Self::PythonProject => Some("requirements.txt"),
            Self::GoProject => Some("go.mod"),
            Self::Unknown => None,
        }
    }

    /// Classify using a marker-presence predicate; first match wins
    pub fn classify(has_marker: impl Fn(&str) -> bool) -> Self {
        Self::PRIORITY
            .into_iter()
            .find(|signature| signature.marker().is_some_and(&has_marker))
            .unwrap_or(Self::Unknown)
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::NodeProject => "Node.js",
            Self::PythonProject => "Python",
            Self::GoProject => "Go",
            Self::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers(present: &'static [&'static str]) -> impl Fn(&str) -> bool {
        move |name| present.iter().any(|m| *m == name)
    }

    #[test]
    fn test_classify_each_signature() {
        assert_eq!(
            DetectionSignature::classify(markers(&["package.json"])),
            DetectionSignature::NodeProject
        );
        assert_eq!(
            DetectionSignature::classify(markers(&["requirements.txt"])),
            DetectionSignature::PythonProject
        );
        assert_eq!(
            DetectionSignature::classify(markers(&["go.mod"])),
            DetectionSignature::GoProject
        );
        assert_eq!(
            DetectionSignature::classify(markers(&["Cargo.toml"])),
            DetectionSignature::Unknown
        );
    }

    #[test]
    fn test_node_wins_over_python_and_go() {
        assert_eq!(
            DetectionSignature::classify(markers(&["go.mod", "requirements.txt", "package.json"])),
            DetectionSignature::NodeProject
        );
    }

    #[test]
    fn test_python_wins_over_go() {
        assert_eq!(
            DetectionSignature::classify(markers(&["go.mod", "requirements.txt"])),
            DetectionSignature::PythonProject
        );
    }
}
