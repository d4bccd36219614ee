//! # Preview Configuration
//!
//! Loads and validates `preview.yaml`:
//!
//! ```yaml
//! services:
//!   web:
//!     dockerfile: web/Dockerfile
//!     buildArgs:
//!       NODE_ENV: production
//!     port: 3000
//!   api:
//!     dockerfile: api/Dockerfile
//!     context: api
//! database:
//!   type: postgres
//!   migrations: db/migrations
//! ```
//!
//! Service and `buildArgs` declaration order is preserved.

mod preview;

pub use preview::{DatabaseConfig, DatabaseType, PreviewConfig};

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::domain::ServiceSpec;
use crate::error::ConfigError;
use preview::{RawDatabaseConfig, RawPreviewConfig};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "preview.yaml";

/// Load `config_file` (relative to `working_dir` unless absolute)
pub fn load_preview_config(
    config_file: &Path,
    working_dir: &Path,
) -> Result<PreviewConfig, ConfigError> {
    let path = if config_file.is_absolute() {
        config_file.to_path_buf()
    } else {
        working_dir.join(config_file)
    };

    if !path.exists() {
        return Err(ConfigError::FileNotFound { path });
    }

    debug!("Loading preview config from {}", path.display());
    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Parse {
        path: path.clone(),
        message: e.to_string(),
    })?;

    parse_preview_config(&content, &path, working_dir)
}

/// Parse and validate config text; `path` is only used in error messages
pub fn parse_preview_config(
    content: &str,
    path: &Path,
    working_dir: &Path,
) -> Result<PreviewConfig, ConfigError> {
    let parse_error = |e: serde_yaml::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(parse_error)?;
    if value.is_null() {
        return Err(ConfigError::Empty);
    }

    let raw: RawPreviewConfig = serde_yaml::from_value(value).map_err(parse_error)?;

    let services = match raw.services {
        Some(serde_yaml::Value::Mapping(mapping)) => mapping,
        _ => {
            return Err(ConfigError::MissingField {
                field: "services (must be a mapping of service name to service)".to_string(),
            })
        }
    };

    let mut specs = Vec::with_capacity(services.len());
    for (key, body) in services {
        let name = match key {
            serde_yaml::Value::String(s) => s,
            serde_yaml::Value::Number(n) => n.to_string(),
            other => {
                return Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    message: format!("service names must be strings, got {:?}", other),
                })
            }
        };

        let mut spec: ServiceSpec = if body.is_null() {
            ServiceSpec::default()
        } else {
            serde_yaml::from_value(body).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: format!("service '{}': {}", name, e),
            })?
        };
        if name.trim().is_empty() {
            return Err(ConfigError::Parse {
                path: path.to_path_buf(),
                message: "service names must not be empty".to_string(),
            });
        }
        spec.name = name;

        validate_service(&spec, working_dir)?;
        specs.push(spec);
    }

    let database = raw
        .database
        .map(|db| resolve_database(db, working_dir))
        .transpose()?;

    Ok(PreviewConfig {
        services: specs,
        database,
        env: raw.env,
        password: raw.password.filter(|p| !p.is_empty()),
    })
}

fn validate_service(spec: &ServiceSpec, working_dir: &Path) -> Result<(), ConfigError> {
    if let Some(port) = spec.port {
        if !(1..=65535).contains(&port) {
            return Err(ConfigError::InvalidPort {
                service: spec.name.clone(),
                port,
            });
        }
    }

    match spec.declared_dockerfile() {
        Some(dockerfile) => {
            let resolved = absolutize(dockerfile, working_dir);
            if !resolved.exists() {
                warn!("Dockerfile not found at path: {}", resolved.display());
            }
        }
        None => warn!(
            "Service '{}' declares no dockerfile; it will not be built",
            spec.name
        ),
    }

    Ok(())
}

fn resolve_database(
    raw: RawDatabaseConfig,
    working_dir: &Path,
) -> Result<DatabaseConfig, ConfigError> {
    let db_type = DatabaseType::parse(&raw.db_type).ok_or_else(|| {
        ConfigError::InvalidDatabaseType {
            db_type: raw.db_type.clone(),
        }
    })?;

    Ok(DatabaseConfig {
        db_type,
        migrations: raw.migrations.map(|m| absolutize(&m, working_dir)),
    })
}

fn absolutize(path: &Path, working_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<PreviewConfig, ConfigError> {
        parse_preview_config(content, Path::new("preview.yaml"), Path::new("/repo"))
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(
            r#"
services:
  web:
    dockerfile: web/Dockerfile
    buildArgs:
      NODE_ENV: production
      VERSION: 2
    env:
      API_URL: http://api:8080
    port: 3000
  api:
    dockerfile: api/Dockerfile
    context: api
database:
  type: postgres
  migrations: db/migrations
env:
  LOG_LEVEL: debug
password: letmein
"#,
        )
        .unwrap();

        let names: Vec<_> = config.services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["web", "api"]);

        let web = config.service("web").unwrap();
        let args: Vec<_> = web.build_args.iter().collect();
        assert_eq!(args, vec![("NODE_ENV", "production"), ("VERSION", "2")]);
        assert_eq!(web.port, Some(3000));

        let db = config.database.unwrap();
        assert_eq!(db.db_type, DatabaseType::Postgres);
        assert_eq!(db.migrations, Some(PathBuf::from("/repo/db/migrations")));
        assert_eq!(config.env.get("LOG_LEVEL").map(String::as_str), Some("debug"));
        assert_eq!(config.password.as_deref(), Some("letmein"));
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let config = parse(
            "services:\n  zeta:\n    dockerfile: z/Dockerfile\n  alpha:\n    dockerfile: a/Dockerfile\n",
        )
        .unwrap();
        let names: Vec<_> = config.services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_service_without_dockerfile_is_accepted() {
        let config = parse("services:\n  docs:\n    port: 8000\n  worker:\n").unwrap();
        assert!(config.services.iter().all(|s| s.dockerfile.is_none()));
        assert_eq!(config.services.len(), 2);
    }

    #[test]
    fn test_empty_config() {
        assert!(matches!(parse(""), Err(ConfigError::Empty)));
    }

    #[test]
    fn test_missing_services() {
        assert!(matches!(
            parse("env:\n  A: b\n"),
            Err(ConfigError::MissingField { .. })
        ));
        assert!(matches!(
            parse("services: [web, api]\n"),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_invalid_port() {
        let err = parse("services:\n  web:\n    dockerfile: Dockerfile\n    port: 70000\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { port: 70000, .. }));
    }

    #[test]
    fn test_invalid_database_type() {
        let err = parse("services:\n  web:\n    dockerfile: Dockerfile\ndatabase:\n  type: oracle\n")
            .unwrap_err();
        assert!(err.to_string().contains("oracle"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_preview_config(Path::new(DEFAULT_CONFIG_FILE), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_from_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "services:\n  web:\n    dockerfile: web/Dockerfile\n",
        )
        .unwrap();

        let config = load_preview_config(Path::new(DEFAULT_CONFIG_FILE), dir.path()).unwrap();
        assert_eq!(config.services[0].name, "web");
    }
}
