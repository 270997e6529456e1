#![forbid(unsafe_code)]

//! Errors for the fallible edges of the crate. Observation and binding
//! themselves never fail.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    // Configuration
    #[error("invalid resubscribe policy: {value:?} (expected \"always\" or \"on-identity-change\")")]
    InvalidPolicy { value: String },

    #[error("invalid boolean for {key}: {value:?}")]
    InvalidFlag { key: String, value: String },

    // Logging
    #[error("logging init failed: {message}")]
    LoggingInit { message: String },
}

impl Error {
    #[must_use]
    pub fn invalid_policy(value: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn invalid_flag(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidFlag {
            key: key.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn logging_init(message: impl Into<String>) -> Self {
        Self::LoggingInit {
            message: message.into(),
        }
    }

    /// Whether the error came from parsing configuration.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::InvalidPolicy { .. } | Self::InvalidFlag { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = Error::invalid_policy("sometimes");
        assert!(err.to_string().contains("\"sometimes\""));

        let err = Error::invalid_flag("OBSERVED_OPTIONAL_ANNOUNCE_REPLACEMENT", "maybe");
        let msg = err.to_string();
        assert!(msg.contains("OBSERVED_OPTIONAL_ANNOUNCE_REPLACEMENT"));
        assert!(msg.contains("\"maybe\""));
        assert!(err.is_config());
    }

    #[test]
    fn logging_failures_are_not_config_errors() {
        let err = Error::logging_init("a global default trace dispatcher has already been set");
        assert!(!err.is_config());
        assert!(err.to_string().starts_with("logging init failed"));
    }
}
