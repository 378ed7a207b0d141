use thiserror::Error;

#[derive(Debug, Error)]
pub enum DcgError {
    /// The caller handed over something the data layer cannot work with:
    /// a missing table name, a malformed filter node, a wrong projection
    /// arity or a delete target without an id.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Failure reported by the backing store, passed through unchanged.
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DcgError {
    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, DcgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_carry_their_message() {
        let err = DcgError::configuration("Missing table name.");
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "configuration error: Missing table name.");
    }

    #[test]
    fn storage_errors_wrap_anyhow() {
        let err: DcgError = anyhow::Error::msg("disk I/O error").into();
        assert!(!err.is_configuration());
        assert_eq!(err.to_string(), "storage error: disk I/O error");
    }
}
