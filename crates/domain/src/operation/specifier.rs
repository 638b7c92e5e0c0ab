//! Symbolic operation names.

use std::fmt;

use crate::error::CallError;

use super::DEFAULT_TAG;

/// A parsed `tag.operationId` (or bare `operationId`) specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    /// Group tag. `default` when the specifier had no tag.
    pub tag: String,
    /// Operation id.
    pub operation_id: String,
}

impl Specifier {
    /// Parses a specifier.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::InvalidSpecifier`] when the text has more than
    /// two `.`-separated segments or an empty segment.
    pub fn parse(specifier: &str) -> Result<Self, CallError> {
        let invalid = || CallError::InvalidSpecifier {
            specifier: specifier.to_string(),
        };

        let pieces: Vec<&str> = specifier.split('.').collect();
        let (tag, operation_id) = match pieces.as_slice() {
            [id] => (DEFAULT_TAG, *id),
            [tag, id] => (*tag, *id),
            _ => return Err(invalid()),
        };

        if tag.is_empty() || operation_id.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            tag: tag.to_string(),
            operation_id: operation_id.to_string(),
        })
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tag, self.operation_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tagged_specifier() {
        let spec = Specifier::parse("health.HealthCheck").unwrap();
        assert_eq!(spec.tag, "health");
        assert_eq!(spec.operation_id, "HealthCheck");
    }

    #[test]
    fn test_bare_specifier_uses_default_tag() {
        let spec = Specifier::parse("HealthCheck").unwrap();
        assert_eq!(spec.tag, "default");
        assert_eq!(spec.to_string(), "default.HealthCheck");
    }

    #[test]
    fn test_rejects_extra_segments() {
        assert_eq!(
            Specifier::parse("a.b.c"),
            Err(CallError::InvalidSpecifier {
                specifier: "a.b.c".to_string()
            })
        );
        assert!(Specifier::parse("").is_err());
        assert!(Specifier::parse("users.").is_err());
    }
}
