use std::path::PathBuf;

use serde::Deserialize;

use crate::quantize_service::QuantizeServiceConfig;

pub const PATH: &str = "colorcut.toml";
/// Environment variable overriding [`PATH`].
pub const PATH_VAR: &str = "COLORCUT_CONFIG";

#[derive(Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub quantize_service: QuantizeServiceConfig,
}

impl Config {
    pub fn path() -> PathBuf {
        std::env::var_os(PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(PATH))
    }
}

#[derive(Deserialize)]
pub struct ServerConfig {
    /// The port under which colorcut should serve.
    pub port: u16,
    /// The root URL that's shown on the documentation website.
    pub root: String,
    /// The largest request body accepted by `/quantize`, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}
