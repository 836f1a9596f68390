//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MARKETPLACE_*` environment variables, and an
//! optional configuration file, in decreasing order of precedence.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::multipart::UploadLimits;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UPLOAD_DIR: &str = "public/uploads";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Configuration for the marketplace server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MARKETPLACE")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection string. In-memory storage is used when unset.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Directory holding uploaded images.
    pub upload_dir: Option<PathBuf>,
    /// Largest accepted image upload, in bytes.
    pub max_image_bytes: Option<usize>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Database URL with surrounding whitespace removed; blank counts as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
            .unwrap_or(UploadLimits::DEFAULT_MAX_FILE_BYTES)
    }
}

#[cfg(test)]
mod tests {
    //! Settings parsing from the environment.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 6] = [
        "MARKETPLACE_BIND_ADDR",
        "MARKETPLACE_DATABASE_URL",
        "MARKETPLACE_DB_MAX_CONNECTIONS",
        "MARKETPLACE_UPLOAD_DIR",
        "MARKETPLACE_MAX_IMAGE_BYTES",
        "MARKETPLACE_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("marketplace")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080".parse().expect("addr"));
        assert!(settings.database_url().is_none());
        assert_eq!(settings.db_max_connections(), 10);
        assert_eq!(settings.upload_dir(), PathBuf::from("public/uploads"));
        assert_eq!(settings.max_image_bytes(), 5 * 1024 * 1024);
        assert!(settings.run_migrations);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("MARKETPLACE_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "MARKETPLACE_DATABASE_URL",
                Some("postgres://market@localhost/market".to_owned()),
            ),
            ("MARKETPLACE_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("MARKETPLACE_UPLOAD_DIR", Some("/srv/uploads".to_owned())),
            ("MARKETPLACE_MAX_IMAGE_BYTES", Some("1024".to_owned())),
            ("MARKETPLACE_RUN_MIGRATIONS", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:9000".parse().expect("addr"));
        assert_eq!(
            settings.database_url(),
            Some("postgres://market@localhost/market")
        );
        assert_eq!(settings.db_max_connections(), 4);
        assert_eq!(settings.upload_dir(), PathBuf::from("/srv/uploads"));
        assert_eq!(settings.max_image_bytes(), 1024);
        assert!(!settings.run_migrations);
    }

    #[rstest]
    fn blank_database_url_selects_memory_storage() {
        let _guard = lock_env(VARS.map(|name| {
            let value = (name == "MARKETPLACE_DATABASE_URL").then(|| "   ".to_owned());
            (name, value)
        }));

        assert!(load_from_empty_args().database_url().is_none());
    }
}
