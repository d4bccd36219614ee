//! Service domain types
//!
//! Defines the per-service build description and the outcome of building it.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Ordered `--build-arg` entries
///
/// Declaration order is preserved so the container build receives the
/// flags in the same order the operator wrote them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildArgs(Vec<(String, String)>);

impl BuildArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an argument, replacing the value in place if the key already exists
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BuildArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (k, v) in iter {
            args.insert(k, v);
        }
        args
    }
}

impl Serialize for BuildArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de> Deserialize<'de> for BuildArgs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // serde_yaml::Mapping keeps insertion order
        let mapping = serde_yaml::Mapping::deserialize(deserializer)?;
        let mut args = BuildArgs::new();
        for (key, value) in mapping {
            let key = scalar_to_string(&key)
                .ok_or_else(|| de::Error::custom("buildArgs keys must be scalars"))?;
            let value = scalar_to_string(&value).ok_or_else(|| {
                de::Error::custom(format!("buildArgs value for '{}' must be a scalar", key))
            })?;
            args.insert(key, value);
        }
        Ok(args)
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        _ => None,
    }
}

/// Build description for one preview service
///
/// `name` is the key the service was declared under; it is filled in by
/// the config loader rather than read from the service body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    #[serde(skip)]
    pub name: String,

    /// Dockerfile path, absolute or relative to the working directory
    #[serde(default, deserialize_with = "blank_path_as_none")]
    pub dockerfile: Option<PathBuf>,

    /// Build context; defaults to the dockerfile's directory
    #[serde(default, deserialize_with = "blank_path_as_none")]
    pub context: Option<PathBuf>,

    #[serde(default)]
    pub build_args: BuildArgs,

    /// Runtime environment, passed through to the deployer untouched
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub port: Option<i64>,
}

impl ServiceSpec {
    /// Create a service with a dockerfile path
    pub fn new(name: impl Into<String>, dockerfile: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dockerfile: Some(dockerfile.into()),
            ..Self::default()
        }
    }

    /// The dockerfile to build, if one is declared
    ///
    /// A blank path counts as undeclared.
    pub fn declared_dockerfile(&self) -> Option<&Path> {
        self.dockerfile.as_deref().filter(|p| !is_blank(p))
    }

    /// Builder: set build context
    pub fn with_context(mut self, context: impl Into<PathBuf>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Builder: add a build argument
    pub fn with_build_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.build_args.insert(key, value);
        self
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

fn blank_path_as_none<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let path = Option::<PathBuf>::deserialize(deserializer)?;
    Ok(path.filter(|p| !is_blank(p)))
}

/// A successfully built (and possibly pushed) image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutcome {
    pub service_name: String,
    pub image_reference: String,
    /// False when no registry is configured and the image only exists locally
    pub pushed: bool,
}
