//! Configuration resolution from the process environment.

use std::env;

use crate::config::schema::{Environment, ServerConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration resolution.
#[derive(Debug)]
pub enum ConfigError {
    /// `PORT` was set but is not a valid port number.
    InvalidPort(String),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidPort(value) => {
                write!(f, "PORT must be a number between 1 and 65535, got {value:?}")
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{err}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    /// Resolve configuration from environment variables, applying defaults.
    ///
    /// Only `PORT` and `NODE_ENV` are read here; everything else keeps its
    /// documented default until a config surface is actually needed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(port) = env::var("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }

        if let Ok(mode) = env::var("NODE_ENV") {
            config.environment = Environment::from_env_value(&mode);
        }

        validate_config(&config).map_err(ConfigError::Validation)?;

        Ok(config)
    }
}
