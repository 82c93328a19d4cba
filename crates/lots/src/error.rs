// ---------------------------------------------------------------------------
// Error types for configuration and generation passes
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors raised while loading or validating a [`crate::BuildingConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Parse(String),
    /// A field holds a value the generator cannot work with.
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "Config parse error: {msg}"),
            ConfigError::Invalid { field, reason } => {
                write!(f, "Invalid config value for `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Reasons a generation request is rejected before any work starts.
///
/// Geometry degeneracies are never reported here: they fall back locally
/// (skip the courtyard, keep the whole block) and the pass still publishes.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// A pass is already in flight. Wait for it or call `reset()` first.
    AlreadyGenerating,
    /// The configuration failed validation.
    InvalidConfig(ConfigError),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::AlreadyGenerating => {
                write!(f, "A generation pass is already in progress")
            }
            GenerationError::InvalidConfig(e) => write!(f, "Cannot generate: {e}"),
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerationError::InvalidConfig(e) => Some(e),
            GenerationError::AlreadyGenerating => None,
        }
    }
}

impl From<ConfigError> for GenerationError {
    fn from(e: ConfigError) -> Self {
        GenerationError::InvalidConfig(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display_invalid() {
        let err = ConfigError::Invalid {
            field: "min_area",
            reason: "must be positive",
        };
        let msg = format!("{err}");
        assert!(msg.contains("min_area"), "got: {msg}");
        assert!(msg.contains("must be positive"), "got: {msg}");
    }

    #[test]
    fn test_generation_error_wraps_config_error() {
        let inner = ConfigError::Parse("unexpected token".to_string());
        let err: GenerationError = inner.clone().into();
        assert_eq!(err, GenerationError::InvalidConfig(inner));
        let msg = format!("{err}");
        assert!(msg.contains("unexpected token"), "got: {msg}");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_already_generating_has_no_source() {
        let err = GenerationError::AlreadyGenerating;
        assert!(std::error::Error::source(&err).is_none());
        assert!(format!("{err}").contains("already in progress"));
    }
}
