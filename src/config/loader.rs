use std::fs;
use std::path::Path;
use tracing::debug;

use super::MinutaConfig;
use crate::error::{MinutaError, Result};

/// Looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "minuta.toml";

/// Load configuration from `path`, or from `minuta.toml` when present.
///
/// An explicit path must exist. Environment overrides are applied last.
pub fn load_config(path: Option<&Path>) -> Result<MinutaConfig> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                read_config_file(default_path)?
            } else {
                debug!("No {} found, using default configuration", DEFAULT_CONFIG_FILE);
                MinutaConfig::default()
            }
        }
    };

    config.merge_env_vars();
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<MinutaConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        MinutaError::Config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let config: MinutaConfig = toml::from_str(&content)?;
    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_render_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("minuta.toml");
        fs::write(
            &path,
            "[render]\nformat_dates = false\nmissing_field_placeholder = \"(preencher)\"\n",
        )
        .unwrap();

        let config = read_config_file(&path).unwrap();
        assert!(!config.render.format_dates);
        assert!(config.render.clean_unused_placeholders);
        assert_eq!(config.render.missing_field_placeholder, "(preencher)");
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("minuta.toml");
        fs::write(&path, "").unwrap();

        assert_eq!(read_config_file(&path).unwrap(), MinutaConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = read_config_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, MinutaError::Config(_)));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("minuta.toml");
        fs::write(&path, "[render\n").unwrap();

        assert!(matches!(
            read_config_file(&path).unwrap_err(),
            MinutaError::Toml(_)
        ));
    }
}
