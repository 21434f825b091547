use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{de::DeserializeOwned, Serialize};

/// Config file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "predikt.toml";

/// Load one section of the shared config file.
///
/// Layers, lowest to highest precedence: `defaults`, the `[section]` table of
/// the TOML file, then environment variables `<env_prefix><KEY>` (nested keys
/// separated by `__`). An explicit `file` that does not exist is an error; the
/// default file is optional.
pub fn load_section<T>(
    section: &str,
    defaults: &T,
    file: Option<&Path>,
    env_prefix: &str,
) -> Result<T, figment::Error>
where
    T: Serialize + DeserializeOwned,
{
    let toml = match file {
        Some(path) => {
            if !path.exists() {
                return Err(figment::Error::from(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            Toml::file(path)
        }
        None => Toml::file(DEFAULT_CONFIG_FILE),
    };

    let key_prefix = section.to_string();
    Figment::new()
        .merge(Serialized::default(section, defaults))
        .merge(toml)
        .merge(
            Env::prefixed(env_prefix)
                .split("__")
                .map(move |k| format!("{}.{}", key_prefix, k).into()),
        )
        .extract_inner(section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Demo {
        port: u16,
        model: String,
        nested: Nested,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Nested {
        depth: usize,
    }

    fn defaults() -> Demo {
        Demo {
            port: 5000,
            model: "DecisionTree".into(),
            nested: Nested { depth: 10 },
        }
    }

    #[test]
    fn test_layers() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                [demo]
                model = "LinearRegression"

                [other]
                port = 1
                "#,
            )?;
            jail.set_env("PREDIKT_DEMO_PORT", "8080");
            jail.set_env("PREDIKT_DEMO_NESTED__DEPTH", "3");

            let cfg: Demo = load_section("demo", &defaults(), Some(Path::new("custom.toml")), "PREDIKT_DEMO_")?;
            assert_eq!(cfg.port, 8080);
            assert_eq!(cfg.model, "LinearRegression");
            assert_eq!(cfg.nested.depth, 3);
            Ok(())
        });
    }

    #[test]
    fn test_defaults_without_file() {
        figment::Jail::expect_with(|_jail| {
            let cfg: Demo = load_section("demo", &defaults(), None, "PREDIKT_DEMO_")?;
            assert_eq!(cfg, defaults());
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_section("demo", &defaults(), Some(Path::new("/no/such/predikt.toml")), "X_");
        assert!(err.is_err());
    }
}
