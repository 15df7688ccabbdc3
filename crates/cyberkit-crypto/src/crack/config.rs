//! Crack engine tuning

/// Crack engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrackConfig {
    /// Yield to the scheduler after this many attempts
    pub yield_interval: usize,
    /// Number of recent attempts kept for display
    pub recent_attempts: usize,
    /// Number of hex characters of each digest kept in an attempt record
    pub hash_prefix_len: usize,
}

impl Default for CrackConfig {
    fn default() -> Self {
        Self {
            yield_interval: 100,
            recent_attempts: 10,
            hash_prefix_len: 20,
        }
    }
}

impl CrackConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the yield interval
    #[must_use]
    pub fn with_yield_interval(mut self, attempts: usize) -> Self {
        self.yield_interval = attempts;
        self
    }

    /// Set how many recent attempts are retained
    #[must_use]
    pub fn with_recent_attempts(mut self, count: usize) -> Self {
        self.recent_attempts = count;
        self
    }

    /// Set the displayed digest prefix length
    #[must_use]
    pub fn with_hash_prefix_len(mut self, len: usize) -> Self {
        self.hash_prefix_len = len;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.yield_interval == 0 {
            return Err("yield_interval must be greater than 0".to_string());
        }

        if self.recent_attempts == 0 {
            return Err("recent_attempts must be greater than 0".to_string());
        }

        if self.hash_prefix_len == 0 {
            return Err("hash_prefix_len must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrackConfig::default();
        assert_eq!(config.yield_interval, 100);
        assert_eq!(config.recent_attempts, 10);
        assert_eq!(config.hash_prefix_len, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_values_rejected() {
        let config = CrackConfig::new();
        assert!(config.clone().with_yield_interval(0).validate().is_err());
        assert!(config.clone().with_recent_attempts(0).validate().is_err());
        assert!(config.with_hash_prefix_len(0).validate().is_err());
    }
}
