use lazy_static::lazy_static;
use common::config::{read_config, AppConfig};

const CONFIG_PATH: &str = "config.toml";

lazy_static! {
    /// Process-wide app configuration, loaded from `config.toml` in the
    /// working directory when present, falling back to defaults.
    pub static ref CFG: AppConfig = read_config(CONFIG_PATH).unwrap_or_default();
}
