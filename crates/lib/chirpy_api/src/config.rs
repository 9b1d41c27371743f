//! API server configuration.

use std::fmt;
use std::path::{Path, PathBuf};

use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{info, warn};

/// Platform name that unlocks dev-only endpoints such as `/admin/reset`.
pub const DEV_PLATFORM: &str = "dev";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:8080").
    pub bind_addr: String,
    /// PostgreSQL connection URL; `None` runs on the in-memory store.
    pub database_url: Option<String>,
    /// Deployment platform (`dev` enables the reset endpoint).
    pub platform: String,
    /// Directory served under `/app/`.
    pub filepath_root: PathBuf,
    /// JWT signing secret.
    pub jwt_secret: String,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                 | Default                          |
    /// |--------------------------|----------------------------------|
    /// | `HOST`                   | `0.0.0.0`                        |
    /// | `PORT`                   | `8080`                           |
    /// | `DATABASE_URL`           | unset (in-memory store)          |
    /// | `PLATFORM`               | `production`                     |
    /// | `FILEPATH_ROOT`          | `.`                              |
    /// | `JWT_SECRET` / `SECRET`  | generated & persisted to file    |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bind_addr: format!(
                "{}:{}",
                var("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
                var("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string()),
            ),
            database_url: var("DATABASE_URL").filter(|url| !url.is_empty()),
            platform: var("PLATFORM").unwrap_or_else(|| "production".into()),
            filepath_root: var("FILEPATH_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            jwt_secret: jwt_secret_from(&var, &jwt_secret_path()),
        }
    }

    /// Whether dev-only endpoints are enabled.
    pub fn is_dev(&self) -> bool {
        self.platform == DEV_PLATFORM
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("platform", &self.platform)
            .field("filepath_root", &self.filepath_root)
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

/// Resolve the JWT secret: env var `JWT_SECRET` → `SECRET` → persisted file.
pub fn resolve_jwt_secret() -> String {
    jwt_secret_from(&|key: &str| std::env::var(key).ok(), &jwt_secret_path())
}

fn jwt_secret_from(var: &impl Fn(&str) -> Option<String>, path: &Path) -> String {
    ["JWT_SECRET", "SECRET"]
        .into_iter()
        .filter_map(var)
        .find(|secret| !secret.is_empty())
        .unwrap_or_else(|| persisted_jwt_secret(path))
}

/// Read the secret stored at `path`, generating and writing one if absent.
pub fn persisted_jwt_secret(path: &Path) -> String {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match std::fs::write(path, &secret) {
        Ok(()) => info!(path = %path.display(), "generated new JWT secret"),
        // Tokens will not survive a restart, but the server still works.
        Err(e) => warn!(path = %path.display(), "could not persist JWT secret: {e}"),
    }
    secret
}

/// Path to the persisted JWT secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chirpy")
        .join("jwt-secret")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn config(platform: &str) -> ApiConfig {
        ApiConfig {
            bind_addr: "127.0.0.1:0".into(),
            database_url: Some("postgres://user:pw@localhost/chirpy".into()),
            platform: platform.into(),
            filepath_root: PathBuf::from("."),
            jwt_secret: "super-secret-value".into(),
        }
    }

    #[test]
    fn only_dev_platform_is_dev() {
        assert!(config("dev").is_dev());
        assert!(!config("production").is_dev());
        assert!(!config("").is_dev());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let rendered = format!("{:?}", config("dev"));
        assert!(!rendered.contains("super-secret-value"));
        assert!(!rendered.contains("user:pw"));
    }

    #[test]
    fn persisted_secret_is_generated_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("jwt-secret");

        let first = persisted_jwt_secret(&path);
        assert_eq!(first.len(), 64);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);

        let second = persisted_jwt_secret(&path);
        assert_eq!(first, second);
    }

    #[test]
    fn existing_secret_file_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jwt-secret");
        std::fs::write(&path, "  from-file\n").unwrap();
        assert_eq!(persisted_jwt_secret(&path), "from-file");
    }

    #[test]
    fn lookup_defaults() {
        let config = ApiConfig::from_lookup(vars(&[("JWT_SECRET", "s")]));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.database_url, None);
        assert_eq!(config.platform, "production");
        assert_eq!(config.filepath_root, PathBuf::from("."));
        assert_eq!(config.jwt_secret, "s");
    }

    #[test]
    fn lookup_reads_every_variable() {
        let config = ApiConfig::from_lookup(vars(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("DATABASE_URL", "postgres://localhost/chirpy"),
            ("PLATFORM", "dev"),
            ("FILEPATH_ROOT", "/srv/www"),
            ("SECRET", "fallback"),
        ]));
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/chirpy")
        );
        assert!(config.is_dev());
        assert_eq!(config.filepath_root, PathBuf::from("/srv/www"));
        assert_eq!(config.jwt_secret, "fallback");
    }

    #[test]
    fn empty_database_url_means_memory_store() {
        let config = ApiConfig::from_lookup(vars(&[("DATABASE_URL", ""), ("JWT_SECRET", "s")]));
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn jwt_secret_prefers_jwt_secret_then_secret_then_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jwt-secret");
        std::fs::write(&path, "from-file").unwrap();

        let both = vars(&[("JWT_SECRET", "primary"), ("SECRET", "fallback")]);
        assert_eq!(jwt_secret_from(&both, &path), "primary");

        let empty_primary = vars(&[("JWT_SECRET", ""), ("SECRET", "fallback")]);
        assert_eq!(jwt_secret_from(&empty_primary, &path), "fallback");

        assert_eq!(jwt_secret_from(&vars(&[]), &path), "from-file");
    }
}
