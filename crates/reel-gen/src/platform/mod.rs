//! Workspace platform backends
//!
//! A platform owns both the caller's file storage and the usage ledger.
//! OpenServ is the hosted platform; the local backend mirrors it on disk
//! for offline runs.

pub mod local;
pub mod openserv;

use crate::config::{PlatformBackend, ReelConfig};
use crate::storage::AssetStorage;
use crate::usage::UsageLedger;
use reel_core::Result;

/// Create the configured storage backend
pub fn create_storage(config: &ReelConfig) -> Result<Box<dyn AssetStorage>> {
    match config.platform.backend {
        PlatformBackend::OpenServ => Ok(Box::new(openserv::OpenServClient::from_config(config)?)),
        PlatformBackend::Local => Ok(Box::new(local::LocalWorkspace::from_config(config))),
    }
}

/// Create the configured usage ledger
pub fn create_ledger(config: &ReelConfig) -> Result<Box<dyn UsageLedger>> {
    match config.platform.backend {
        PlatformBackend::OpenServ => Ok(Box::new(openserv::OpenServClient::from_config(config)?)),
        PlatformBackend::Local => Ok(Box::new(local::LocalWorkspace::from_config(config))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_backend_needs_no_key() {
        let mut config = ReelConfig::default();
        config.platform.backend = PlatformBackend::Local;
        assert_eq!(create_storage(&config).unwrap().name(), "local");
        assert_eq!(create_ledger(&config).unwrap().name(), "local");
    }

    #[test]
    fn test_openserv_backend_requires_key() {
        let config = ReelConfig::default();
        assert!(create_storage(&config).is_err());
        assert!(create_ledger(&config).is_err());
    }
}
