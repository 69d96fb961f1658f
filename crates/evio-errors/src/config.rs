//! Configuration errors.

/// Invalid engine or tool configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A field that must be non-zero is zero.
    #[error("{field} must be greater than zero")]
    Zero {
        /// Name of the offending field
        field: &'static str,
    },

    /// A field exceeds its upper bound.
    #[error("{field} = {value} exceeds the limit of {max}")]
    TooLarge {
        /// Name of the offending field
        field: &'static str,
        /// Configured value
        value: usize,
        /// Largest accepted value
        max: usize,
    },

    /// A field is below the minimum implied by another field.
    #[error("{field} = {value} is smaller than {min_field} = {min}")]
    TooSmall {
        /// Name of the offending field
        field: &'static str,
        /// Configured value
        value: usize,
        /// Field that sets the minimum
        min_field: &'static str,
        /// Smallest accepted value
        min: usize,
    },
}

impl ConfigError {
    /// Name of the offending field, if the error concerns one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::Zero { field }
            | ConfigError::TooLarge { field, .. }
            | ConfigError::TooSmall { field, .. } => Some(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ConfigError::Zero {
            field: "read_batch",
        };
        assert_eq!(err.to_string(), "read_batch must be greater than zero");
        assert_eq!(err.field(), Some("read_batch"));

        let err = ConfigError::TooLarge {
            field: "read_batch",
            value: 5000,
            max: 4096,
        };
        assert!(err.to_string().contains("5000"));

        let err = ConfigError::TooSmall {
            field: "incoming_capacity",
            value: 8,
            min_field: "read_batch",
            min: 64,
        };
        assert_eq!(err.to_string(), "incoming_capacity = 8 is smaller than read_batch = 64");
        assert_eq!(err.field(), Some("incoming_capacity"));
    }
}
