use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown operating phase: {0}")]
    UnknownPhase(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CoreError::UnknownPhase("orbit".to_string());
        assert!(error.to_string().contains("orbit"));

        let error = CoreError::InvalidValue {
            key: "min_fitness".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid value for min_fitness: abc");
    }
}
