use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use predikt_embed::EmbedderConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    pub enabled: bool,
    pub root: PathBuf,
    pub experiment: String,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        TrackingConfig {
            enabled: true,
            root: PathBuf::from("mlruns"),
            experiment: "Gender Classification".to_string(),
        }
    }
}

/// `[gender]` section of `predikt.toml`, overridable with `PREDIKT_GENDER_*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderConfig {
    pub data_path: PathBuf,
    /// Directory holding the fitted artifacts.
    pub artifact_dir: PathBuf,
    /// Must be the same for training and serving.
    pub embedder: EmbedderConfig,
    pub pca_components: usize,
    pub test_ratio: f64,
    pub seed: u64,
    pub max_iter: usize,
    pub learning_rate: f64,
    /// Inverse L2 regularisation strength.
    pub c: f64,
    pub tracking: TrackingConfig,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for GenderConfig {
    fn default() -> Self {
        GenderConfig {
            data_path: PathBuf::from("data/users.csv"),
            artifact_dir: PathBuf::from("artifacts"),
            embedder: EmbedderConfig::default(),
            pca_components: 23,
            test_ratio: 0.2,
            seed: 42,
            max_iter: 1000,
            learning_rate: 0.1,
            c: 1.0,
            tracking: TrackingConfig::default(),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl GenderConfig {
    pub fn load(file: Option<&Path>) -> Result<Self, figment::Error> {
        predikt_serve::load_section("gender", &GenderConfig::default(), file, "PREDIKT_GENDER_")
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_nested_embedder() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "predikt.toml",
                r#"
                [gender]
                pca_components = 8
                embedder = { kind = "hashing", dimension = 64 }

                [gender.tracking]
                enabled = false
                "#,
            )?;
            jail.set_env("PREDIKT_GENDER_PORT", "9000");

            let cfg = GenderConfig::load(None)?;
            assert_eq!(cfg.pca_components, 8);
            assert_eq!(cfg.port, 9000);
            assert!(!cfg.tracking.enabled);
            assert_eq!(cfg.tracking.root, PathBuf::from("mlruns"));
            assert_eq!(
                cfg.embedder,
                EmbedderConfig::Hashing { dimension: 64, ngram_min: 1, ngram_max: 3 }
            );
            Ok(())
        });
    }
}
