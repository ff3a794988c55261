//! Configuration options for feature derivation.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Number of prior events averaged by the rolling form feature.
pub const DEFAULT_ROLLING_WINDOW: usize = 5;

/// Options controlling feature derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureOptions {
    /// Number of most recent prior events in the rolling form window.
    pub rolling_window: usize,

    /// Z-score the qualifying gap across the whole output.
    ///
    /// When false the raw gap in seconds is emitted.
    pub normalize_delta: bool,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            rolling_window: DEFAULT_ROLLING_WINDOW,
            normalize_delta: true,
        }
    }
}

impl FeatureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rolling_window(mut self, window: usize) -> Self {
        self.rolling_window = window;
        self
    }

    pub fn with_normalize_delta(mut self, enable: bool) -> Self {
        self.normalize_delta = enable;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rolling_window == 0 {
            return Err(ConfigError::InvalidWindow);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = FeatureOptions::default();
        assert_eq!(options.rolling_window, 5);
        assert!(options.normalize_delta);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn zero_window_is_rejected() {
        let options = FeatureOptions::new().with_rolling_window(0);
        assert!(matches!(options.validate(), Err(ConfigError::InvalidWindow)));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let options: FeatureOptions = serde_json::from_str(r#"{"rolling_window": 3}"#).unwrap();
        assert_eq!(options.rolling_window, 3);
        assert!(options.normalize_delta);
    }
}
