use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::plugin::RenderPurpose;

pub const DEFAULT_CONFIG_FILE: &str = ".uuidfn.yaml";

#[derive(Default, Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Config {
    #[serde(default)]
    pub renderer: RendererConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RendererConfig {
    #[serde(default)]
    pub purpose: RenderPurpose,
    #[serde(default = "default_expand_env")]
    pub expand_env: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        RendererConfig {
            purpose: RenderPurpose::default(),
            expand_env: default_expand_env(),
        }
    }
}

fn default_expand_env() -> bool {
    true
}

pub fn new(config_file: &str) -> Result<Config, Box<dyn Error>> {
    let content = fs::read_to_string(config_file)?;

    new_from_str(&content)
}

pub fn new_from_str(content: &str) -> Result<Config, Box<dyn Error>> {
    let config: Config = serde_yaml::from_str(content)?;

    Ok(config)
}

/// Load the given config file, or the default one when it exists.
pub fn load(config_file: Option<&str>) -> Result<Config, Box<dyn Error>> {
    match config_file {
        Some(f) => new(f),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => new(DEFAULT_CONFIG_FILE),
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_config_file() {
        let expected: Config = Config {
            renderer: RendererConfig {
                purpose: RenderPurpose::Preview,
                expand_env: true,
            }
        };

        let config = new(DEFAULT_CONFIG_FILE).unwrap();

        assert_eq!(expected, config)
    }

    #[test]
    fn test_read_config_str() {
        let config = new_from_str("renderer:\n  purpose: send\n").unwrap();
        assert_eq!(RenderPurpose::Send, config.renderer.purpose);
        assert!(config.renderer.expand_env);

        let config = new_from_str("renderer:\n  expand_env: false\n").unwrap();
        assert_eq!(RenderPurpose::Preview, config.renderer.purpose);
        assert!(!config.renderer.expand_env);

        assert!(new_from_str("renderer:\n  purpose: commit\n").is_err());
    }

    #[test]
    fn test_load() {
        assert!(load(Some("does-not-exist.yaml")).is_err());
        assert_eq!(Config::default(), load(None).unwrap());
    }
}
