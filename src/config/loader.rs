//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::SimulatorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "IO error: {}", e),
            LoadError::Parse(e) => write!(f, "Parse error: {}", e),
            LoadError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Parse(e) => Some(e),
            LoadError::Validation(_) => None,
        }
    }
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<SimulatorConfig, LoadError> {
    let config: SimulatorConfig = toml::from_str(content).map_err(LoadError::Parse)?;

    validate_config(&config).map_err(LoadError::Validation)?;

    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SimulatorConfig, LoadError> {
    let content = fs::read_to_string(path).map_err(LoadError::Io)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("breaker-config-{}.toml", std::process::id()));
        fs::write(
            &path,
            "[breaker]\nname = \"inventory\"\ntrigger_threshold = 5\n\n[observability]\njson = true\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.breaker.name.as_deref(), Some("inventory"));
        assert_eq!(config.breaker.trigger_threshold, 5);
        assert_eq!(config.breaker.release_threshold, 10);
        assert!(config.observability.json);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let result = load_config(Path::new("/nonexistent/breaker.toml"));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_parse_error() {
        let result = parse_config("[breaker]\ntrigger_threshold = \"three\"\n");
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_validation_error_message() {
        let err = parse_config("[breaker]\ntrigger_threshold = 0\nrelease_threshold = 0\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: breaker.trigger_threshold must be greater than zero, \
             breaker.release_threshold must be greater than zero"
        );
    }
}
