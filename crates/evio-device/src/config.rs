//! Engine configuration.

use evio_errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Largest accepted `read_batch`, in records.
pub const MAX_READ_BATCH: usize = 4096;

/// Queue and buffer sizing for the event I/O engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity of the incoming event queue.
    ///
    /// Default: 64, enough to absorb one full read burst.
    pub incoming_capacity: usize,

    /// Capacity of the outgoing event queue.
    ///
    /// Default: 1. Writes are rare and latency sensitive.
    pub outgoing_capacity: usize,

    /// Records requested per read.
    ///
    /// Default: 64.
    pub read_batch: usize,

    /// Capacity of the diagnostics channel. Diagnostics beyond this are
    /// dropped (they are still logged).
    ///
    /// Default: 32.
    pub diagnostics_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            incoming_capacity: 64,
            outgoing_capacity: 1,
            read_batch: 64,
            diagnostics_capacity: 32,
        }
    }
}

impl EngineConfig {
    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a capacity or the read batch is zero, if the
    /// read batch exceeds [`MAX_READ_BATCH`], or if the incoming queue
    /// cannot hold one full read.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let nonzero = [
            ("incoming_capacity", self.incoming_capacity),
            ("outgoing_capacity", self.outgoing_capacity),
            ("read_batch", self.read_batch),
            ("diagnostics_capacity", self.diagnostics_capacity),
        ];
        if let Some((field, _)) = nonzero.into_iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::Zero { field });
        }
        if self.read_batch > MAX_READ_BATCH {
            return Err(ConfigError::TooLarge {
                field: "read_batch",
                value: self.read_batch,
                max: MAX_READ_BATCH,
            });
        }
        if self.incoming_capacity < self.read_batch {
            return Err(ConfigError::TooSmall {
                field: "incoming_capacity",
                value: self.incoming_capacity,
                min_field: "read_batch",
                min: self.read_batch,
            });
        }
        Ok(())
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set the incoming queue capacity.
    #[must_use]
    pub fn incoming_capacity(mut self, n: usize) -> Self {
        self.config.incoming_capacity = n;
        self
    }

    /// Set the outgoing queue capacity.
    #[must_use]
    pub fn outgoing_capacity(mut self, n: usize) -> Self {
        self.config.outgoing_capacity = n;
        self
    }

    /// Set the number of records requested per read.
    #[must_use]
    pub fn read_batch(mut self, n: usize) -> Self {
        self.config.read_batch = n;
        self
    }

    /// Set the diagnostics channel capacity.
    #[must_use]
    pub fn diagnostics_capacity(mut self, n: usize) -> Self {
        self.config.diagnostics_capacity = n;
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// See [`EngineConfig::validate`].
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.incoming_capacity, 64);
        assert_eq!(config.outgoing_capacity, 1);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = EngineConfig::builder().outgoing_capacity(0).build();
        assert_eq!(
            err,
            Err(ConfigError::Zero {
                field: "outgoing_capacity"
            })
        );
    }

    #[test]
    fn test_oversized_batch_rejected() {
        let err = EngineConfig::builder().read_batch(MAX_READ_BATCH + 1).build();
        assert!(matches!(err, Err(ConfigError::TooLarge { field: "read_batch", .. })));
    }

    #[test]
    fn test_incoming_queue_must_hold_one_read() {
        let err = EngineConfig::builder().incoming_capacity(16).build();
        assert!(matches!(
            err,
            Err(ConfigError::TooSmall { field: "incoming_capacity", min: 64, .. })
        ));

        let config = EngineConfig::builder().incoming_capacity(16).read_batch(16).build();
        assert!(config.is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() -> Result<(), serde_json::Error> {
        let config: EngineConfig = serde_json::from_str(r#"{ "read_batch": 8 }"#)?;
        assert_eq!(config.read_batch, 8);
        assert_eq!(config.incoming_capacity, 64);
        Ok(())
    }
}
