//! Preview environment configuration types.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::ServiceSpec;

/// Supported preview databases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    Postgres,
    Mysql,
    Mongodb,
}

impl DatabaseType {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "postgres" => Some(Self::Postgres),
            "mysql" => Some(Self::Mysql),
            "mongodb" => Some(Self::Mongodb),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Mongodb => "mongodb",
        }
    }
}

/// Database provisioned alongside the preview services
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub db_type: DatabaseType,
    /// Migrations directory, absolute after loading
    pub migrations: Option<PathBuf>,
}

/// Validated contents of `preview.yaml`
#[derive(Debug, Clone, Default)]
pub struct PreviewConfig {
    /// Services in declaration order
    pub services: Vec<ServiceSpec>,
    pub database: Option<DatabaseConfig>,
    /// Environment shared by all services
    pub env: BTreeMap<String, String>,
    /// Optional password protecting the preview URLs
    pub password: Option<String>,
}

impl PreviewConfig {
    pub fn service(&self, name: &str) -> Option<&ServiceSpec> {
        self.services.iter().find(|s| s.name == name)
    }
}

/// `preview.yaml` as written, before validation
#[derive(Debug, Deserialize)]
pub(super) struct RawPreviewConfig {
    #[serde(default)]
    pub services: Option<serde_yaml::Value>,

    #[serde(default)]
    pub database: Option<RawDatabaseConfig>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawDatabaseConfig {
    #[serde(rename = "type")]
    pub db_type: String,

    #[serde(default)]
    pub migrations: Option<PathBuf>,
}
