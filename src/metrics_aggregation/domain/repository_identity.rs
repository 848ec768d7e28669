use crate::shared::error::MetricsError;
use crate::shared::Result;
use std::fmt;

/// Maximum length for a repository identifier
const MAX_REPOSITORY_NAME_LENGTH: usize = 200;

/// Stable repository identifier.
///
/// Used verbatim as the collector's `instance` key, so a re-push for the
/// same repository replaces the previous snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryIdentity(String);

impl RepositoryIdentity {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name: String = name.into();
        let name = name.trim();

        if name.is_empty() {
            return Err(MetricsError::InvalidConfiguration {
                field: "repository".to_string(),
                reason: "Repository name cannot be empty".to_string(),
            }
            .into());
        }

        if name.len() > MAX_REPOSITORY_NAME_LENGTH {
            return Err(MetricsError::InvalidConfiguration {
                field: "repository".to_string(),
                reason: format!(
                    "Repository name is too long ({} bytes). Maximum allowed: {} bytes",
                    name.len(),
                    MAX_REPOSITORY_NAME_LENGTH
                ),
            }
            .into());
        }

        // '/' would split the collector's grouping-key path
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(MetricsError::InvalidConfiguration {
                field: "repository".to_string(),
                reason: format!(
                    "Repository name '{}' contains invalid characters. Only ASCII alphanumerics, hyphens, underscores and dots are allowed.",
                    name
                ),
            }
            .into());
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
