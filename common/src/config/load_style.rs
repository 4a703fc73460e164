use serde::{Deserialize, Serialize};

/// How the effective `AppConfig` for a run was obtained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoadStyle {
    /// Built-in defaults, no config file read.
    DEFAULT,

    /// Loaded from a TOML file on disk.
    TOML,
}
