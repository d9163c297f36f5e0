use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SangeetError>;

#[derive(Debug, Error)]
pub enum SangeetError {
    /// A caller-supplied value is out of range (non-positive frequency or
    /// duration, a scale with too few notes, a malformed config table).
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// The sample buffer cannot be turned into a playable WAV file.
    #[error("encoding error: {message}")]
    Encoding { message: String },

    /// Engine configuration JSON failed to parse.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl SangeetError {
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        SangeetError::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        SangeetError::Encoding {
            message: message.into(),
        }
    }
}

/// Reject anything that is not a finite number greater than zero.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SangeetError::invalid_param(
            name,
            format!("must be a finite value > 0, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_param_message_names_the_field() {
        let err = SangeetError::invalid_param("duration", "must be > 0");
        let msg = err.to_string();
        assert!(msg.contains("duration"), "{msg}");
        assert!(msg.contains("must be > 0"), "{msg}");
    }

    #[test]
    fn ensure_positive_rejects_zero_nan_and_infinity() {
        assert!(ensure_positive("f", 0.0).is_err());
        assert!(ensure_positive("f", -1.0).is_err());
        assert!(ensure_positive("f", f64::NAN).is_err());
        assert!(ensure_positive("f", f64::INFINITY).is_err());
        assert_eq!(ensure_positive("f", 2.5).unwrap(), 2.5);
    }

    #[test]
    fn config_error_wraps_serde() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SangeetError = parse.into();
        assert!(matches!(err, SangeetError::Config(_)));
    }
}
