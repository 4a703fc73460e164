mod load_style;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use crate::config::load_style::LoadStyle;

use crate::err::decode_error::ReError;

/// App-level configuration plus a record of how it was obtained.
#[derive(Debug, Serialize, Deserialize)]
pub struct FConfig {
    config: AppConfig,

    /// How the config was loaded.
    load_style: LoadStyle,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    app_name: String,

    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub base: BaseConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BaseConfig {
    /// Log output directory.
    log_dir: Option<String>,
}

/// HTTP listener config for the migration trigger endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Default blob store buckets and job-wide defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Primary bucket: input IDMS artifacts and the SQL script output.
    pub primary_bucket: String,
    /// Secondary bucket: COBOL copybook output.
    pub secondary_bucket: String,
    /// Root directory used by the local filesystem blob store implementation.
    pub local_root: Option<String>,
}

impl Default for FConfig {
    fn default() -> Self {
        FConfig {
            config: AppConfig::default(),
            load_style: LoadStyle::DEFAULT,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            app_name: String::from("idms-mysql-migration"),
            base: BaseConfig::default(),
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            primary_bucket: "idms-eve".to_string(),
            secondary_bucket: "idms-theory".to_string(),
            local_root: Some("/tmp/idms_migration/blobs".to_string()),
        }
    }
}

impl Default for BaseConfig {
    fn default() -> Self {
        BaseConfig {
            log_dir: Some(String::from("/tmp/idms_migration")),
        }
    }
}

impl FConfig {
    pub fn new(c: AppConfig) -> Self {
        FConfig {
            config: c,
            load_style: LoadStyle::TOML,
        }
    }

    pub fn get_config(self) -> AppConfig {
        self.config
    }

    pub fn get_load_style(self) -> LoadStyle {
        self.load_style.clone()
    }
}

impl BaseConfig {
    pub fn get_log_dir(&self) -> Option<String> {
        self.log_dir.clone()
    }
}

/// Read and parse the config file at `path`.
pub fn read_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ReError> {
    let mut file = File::open(path.as_ref())?;
    let mut s = String::new();

    file.read_to_string(&mut s)?;
    toml::from_str(s.as_str())
        .map_err(|e| ReError::ConfigFileParseErr(e.to_string()))
}

#[cfg(test)]
mod test {
    use crate::config::AppConfig;

    #[test]
    fn test_defaults() {
        let c = AppConfig::default();
        assert_eq!(c.server.port, 8080);
        assert_eq!(c.storage.primary_bucket, "idms-eve");
    }
}
