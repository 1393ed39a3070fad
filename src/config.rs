//! Insulator classification service configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Closed set of class labels the classifier was trained on.
/// Index order must match the model's output layer.
pub const CLASS_LABELS: [&str; 2] = ["Kırık", "Sağlam"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Origins allowed by the CORS layer.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub path: PathBuf,
    pub device: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn default_path() -> &'static str {
        "config.toml"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 8000,
                allowed_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ],
            },
            model: ModelConfig {
                path: PathBuf::from("models/efficientnet_b0_izolator.onnx"),
                device: "CPU".to_string(),
            },
            storage: StorageConfig {
                uri: "mongodb://localhost:27017/".to_string(),
                database: "izolatorDB".to_string(),
                collection: "tahminler".to_string(),
            },
        }
    }
}
