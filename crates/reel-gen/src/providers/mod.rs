//! Provider registry
//!
//! Maps provider names to concrete implementations.

pub mod mock;
pub mod veo;

use crate::config::ReelConfig;
use crate::provider::VideoProvider;
use reel_core::{ReelError, Result};

/// Create a provider by name with configuration
pub fn create_provider(name: &str, config: &ReelConfig) -> Result<Box<dyn VideoProvider>> {
    match name {
        "mock" => Ok(Box::new(mock::MockVideoProvider::new())),
        "veo" => Ok(Box::new(veo::VeoProvider::from_config(config)?)),
        _ => Err(ReelError::Configuration(format!(
            "Unknown provider '{}'. Available: {}",
            name,
            available_providers().join(", ")
        ))),
    }
}

/// List all available provider names
pub fn available_providers() -> Vec<&'static str> {
    vec!["veo", "mock"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_mock_without_keys() {
        let provider = create_provider("mock", &ReelConfig::default()).unwrap();
        assert_eq!(provider.name(), "mock");
    }

    #[test]
    fn test_unknown_provider() {
        let err = create_provider("sora", &ReelConfig::default())
            .err()
            .expect("unknown provider");
        assert!(err.to_string().contains("veo, mock"));
    }
}
