//! API credential handling.

use annotation::ConfigError;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// A Gemini API key.
///
/// `Debug` output is redacted so the key never reaches a log line.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a key, returning `None` if `value` is blank.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Reads the key from [`API_KEY_ENV_VAR`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_var(API_KEY_ENV_VAR)
    }

    /// Reads the key from `variable`, failing if it is unset, not valid
    /// Unicode, or blank.
    pub fn from_env_var(variable: &str) -> Result<Self, ConfigError> {
        std::env::var(variable)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ConfigError::MissingCredential {
                variable: variable.to_owned(),
            })
    }

    /// Returns the raw key for use in a request header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keys_are_rejected() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new(" \n").is_none());
        assert_eq!(ApiKey::new(" abc \n").unwrap().expose(), "abc");
    }

    #[test]
    fn debug_output_hides_the_key() {
        let key = ApiKey::new("secret-value").unwrap();
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
    }

    #[test]
    fn unset_variable_is_a_missing_credential() {
        let err = ApiKey::from_env_var("CSV_ANNOTATOR_TEST_UNSET_KEY").unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingCredential {
                variable: "CSV_ANNOTATOR_TEST_UNSET_KEY".into()
            }
        );
    }

    #[test]
    fn set_variable_is_read() {
        std::env::set_var("CSV_ANNOTATOR_TEST_SET_KEY", "k-123");
        let key = ApiKey::from_env_var("CSV_ANNOTATOR_TEST_SET_KEY").unwrap();
        assert_eq!(key.expose(), "k-123");

        std::env::set_var("CSV_ANNOTATOR_TEST_BLANK_KEY", "   ");
        assert!(ApiKey::from_env_var("CSV_ANNOTATOR_TEST_BLANK_KEY").is_err());
    }
}
