//! Engine configuration file loading.

use crate::error::CliError;
use evio_device::EngineConfig;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Loads an [`EngineConfig`] from `path`, or returns the defaults.
///
/// `.yaml`/`.yml` files are read as YAML and everything else as JSON.
/// Missing fields keep their defaults; the result is validated.
pub fn load(path: Option<&Path>) -> Result<EngineConfig, CliError> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };

    let text = fs::read_to_string(path)?;
    let config: EngineConfig = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => serde_yaml::from_str(&text)?,
        _ => serde_json::from_str(&text)?,
    };
    config
        .validate()
        .map_err(|e| CliError::InvalidConfiguration(format!("{}: {e}", path.display())))?;

    debug!(path = %path.display(), ?config, "loaded engine configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_defaults_without_file() -> TestResult {
        assert_eq!(load(None)?, EngineConfig::default());
        Ok(())
    }

    #[test]
    fn test_partial_json() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{ "incoming_capacity": 256 }"#)?;

        let config = load(Some(&path))?;
        assert_eq!(config.incoming_capacity, 256);
        assert_eq!(config.outgoing_capacity, EngineConfig::default().outgoing_capacity);
        Ok(())
    }

    #[test]
    fn test_yaml() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("engine.yaml");
        fs::write(&path, "read_batch: 8\noutgoing_capacity: 4\n")?;

        let config = load(Some(&path))?;
        assert_eq!(config.read_batch, 8);
        assert_eq!(config.outgoing_capacity, 4);
        Ok(())
    }

    #[test]
    fn test_zero_capacity_is_invalid() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("engine.yml");
        fs::write(&path, "incoming_capacity: 0\n")?;

        let err = load(Some(&path)).err();
        assert!(matches!(
            err,
            Some(CliError::InvalidConfiguration(ref m)) if m.contains("incoming_capacity")
        ));
        Ok(())
    }

    #[test]
    fn test_malformed_json() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("engine.json");
        fs::write(&path, "{ not json")?;
        assert!(matches!(load(Some(&path)), Err(CliError::JsonError(_))));
        Ok(())
    }
}
