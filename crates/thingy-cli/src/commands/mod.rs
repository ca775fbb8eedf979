//! Command implementations.

pub mod info;
pub mod read;
pub mod scan;
pub mod watch;

use thingy_core::Device;

use crate::config::Config;

/// Resolve the target device identifier: the flag wins, then the config file.
///
/// `None` means "take the first Thingy in range".
pub fn resolve_device(flag: Option<String>, config: &Config) -> Option<String> {
    flag.or_else(|| config.device.clone())
}

/// Connect to the resolved target, or to the first Thingy advertising the
/// environment service when no target was given.
pub async fn connect_target(identifier: Option<&str>) -> thingy_core::Result<Device> {
    match identifier {
        Some(id) => Device::connect(id).await,
        None => Device::connect_any().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_device_flag_wins() {
        let config = Config {
            device: Some("from-config".to_string()),
            ..Config::default()
        };
        let resolved = resolve_device(Some("from-flag".to_string()), &config);
        assert_eq!(resolved.as_deref(), Some("from-flag"));
    }

    #[test]
    fn test_resolve_device_falls_back_to_config() {
        let config = Config {
            device: Some("from-config".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_device(None, &config).as_deref(), Some("from-config"));
    }

    #[test]
    fn test_resolve_device_none() {
        assert!(resolve_device(None, &Config::default()).is_none());
    }
}
