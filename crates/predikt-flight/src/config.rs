use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use predikt_pipeline::RegressorSpec;
use predikt_preprocessing::{ColumnTransformer, HandleUnknown};
use serde::{Deserialize, Serialize};

/// Where the trainer writes the pipeline when no explicit path is configured,
/// and where the server looks beside its executable.
pub const DEFAULT_MODEL_PATH: &str = "models/flight_price_model.json";

/// Artifact location inside the serving container.
pub const CONTAINER_MODEL_PATH: &str = "/app/models/flight_price_model.json";

/// A named model the trainer fits and scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub model: RegressorSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    R2,
    Mae,
    Rmse,
}

/// How the trainer picks the pipeline it saves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum Selection {
    /// Always the candidate with this name, whatever it scored.
    Fixed { name: String },
    /// The candidate with the best value of `metric`.
    Best { metric: Metric },
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Fixed {
            name: "DecisionTree".to_string(),
        }
    }
}

/// `[flight]` section of `predikt.toml`, overridable with `PREDIKT_FLIGHT_*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightConfig {
    pub data_path: PathBuf,
    /// Explicit artifact path; wins over every default location.
    pub model_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub test_ratio: f64,
    pub seed: u64,
    pub candidates: Vec<Candidate>,
    pub selection: Selection,
    /// One-hot policy for categories not seen at training time.
    pub unknown_categories: HandleUnknown,
    /// Per-column overrides of `unknown_categories`.
    pub unknown_category_overrides: BTreeMap<String, HandleUnknown>,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for FlightConfig {
    fn default() -> Self {
        FlightConfig {
            data_path: PathBuf::from("flights.csv"),
            model_path: None,
            report_path: None,
            test_ratio: 0.2,
            seed: 42,
            candidates: vec![
                Candidate {
                    name: "LinearRegression".to_string(),
                    model: RegressorSpec::LinearRegression,
                },
                Candidate {
                    name: "DecisionTree".to_string(),
                    model: RegressorSpec::DecisionTree { max_depth: 10 },
                },
            ],
            selection: Selection::default(),
            unknown_categories: HandleUnknown::Ignore,
            unknown_category_overrides: BTreeMap::new(),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl FlightConfig {
    pub fn load(file: Option<&Path>) -> Result<Self, figment::Error> {
        predikt_serve::load_section("flight", &FlightConfig::default(), file, "PREDIKT_FLIGHT_")
    }

    /// Unfitted column preprocessor carrying the configured unknown-category policies.
    pub fn preprocessor(&self) -> ColumnTransformer {
        self.unknown_category_overrides.iter().fold(
            ColumnTransformer::new().with_default_policy(self.unknown_categories),
            |ct, (column, policy)| ct.with_policy(column.clone(), *policy),
        )
    }

    /// Path the trainer writes to.
    pub fn output_path(&self) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH))
    }

    /// Path the server loads from.
    pub fn serving_path(&self) -> PathBuf {
        predikt_serve::resolve_artifact(
            self.model_path.as_deref(),
            Path::new(CONTAINER_MODEL_PATH),
            Path::new(DEFAULT_MODEL_PATH),
        )
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reproduce_fixed_tree() {
        let cfg = FlightConfig::default();
        assert_eq!(cfg.selection, Selection::Fixed { name: "DecisionTree".into() });
        assert_eq!(cfg.candidates.len(), 2);
        assert_eq!(cfg.bind_addr().port(), 5000);
        assert_eq!(cfg.output_path(), PathBuf::from(DEFAULT_MODEL_PATH));
    }

    #[test]
    fn test_toml_section() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "predikt.toml",
                r#"
                [flight]
                port = 8081
                unknown_categories = "error"
                selection = { policy = "best", metric = "rmse" }
                candidates = [
                    { name = "Ridge", model = { kind = "Ridge", alpha = 0.5 } },
                ]
                "#,
            )?;
            jail.set_env("PREDIKT_FLIGHT_MODEL_PATH", "/tmp/m.json");

            let cfg = FlightConfig::load(None)?;
            assert_eq!(cfg.port, 8081);
            assert_eq!(cfg.unknown_categories, HandleUnknown::Error);
            assert_eq!(cfg.selection, Selection::Best { metric: Metric::Rmse });
            assert_eq!(cfg.candidates[0].model, RegressorSpec::Ridge { alpha: 0.5 });
            assert_eq!(cfg.serving_path(), PathBuf::from("/tmp/m.json"));
            Ok(())
        });
    }
}
