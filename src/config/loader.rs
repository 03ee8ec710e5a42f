//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::HealthcheckConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load configuration from a TOML file.
///
/// Missing fields take their defaults; out-of-range values are normalized
/// the same way the builder surface treats them.
pub fn load_config(path: &Path) -> Result<HealthcheckConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: HealthcheckConfig = toml::from_str(&content)?;
    config.normalize();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_partial_config_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 9000\npath = \"livez\"\ncheck_timeout_secs = 0").unwrap();

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.path, "/livez");
        // Zero timeout normalizes back to the default.
        assert_eq!(config.check_timeout_secs, 10);
        assert_eq!(config.shutdown_grace_secs, 10);
        assert_eq!(config.concurrency, -1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_config(Path::new("/nonexistent/healthcheck.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
