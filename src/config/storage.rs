//! Reservation storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where the reservation table lives
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding manual reservations
    #[serde(default = "default_reservations_file")]
    pub reservations_file: PathBuf,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.reservations_file.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("storage.reservations_file"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            reservations_file: default_reservations_file(),
        }
    }
}

fn default_reservations_file() -> PathBuf {
    PathBuf::from("/data/reservations.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path() {
        let config = StorageConfig::default();
        assert_eq!(config.reservations_file, PathBuf::from("/data/reservations.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_path_is_invalid() {
        let config = StorageConfig {
            reservations_file: PathBuf::new(),
        };
        assert!(config.validate().is_err());
    }
}
