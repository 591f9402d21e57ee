//! Startup configuration snapshot.
//!
//! The robot's bootstrap writes a JSON file with the team identity and the
//! attached cameras; it is loaded exactly once and treated as immutable for
//! the rest of the process. An unreadable or unparsable file is fatal; the
//! coprocessor cannot run without a resolution and identity.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vision::CameraModel;

/// Resolution of one attached camera.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSetup {
    pub width: u32,
    pub height: u32,
}

/// Immutable startup snapshot: team identity plus camera resolutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupConfig {
    pub team: u32,
    pub cameras: Vec<CameraSetup>,
}

/// Startup configuration failures. All fatal; never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read startup config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse startup config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("startup config defines {available} cameras, camera {index} requested")]
    MissingCamera { index: usize, available: usize },
}

impl StartupConfig {
    /// Load the snapshot from a JSON file (`/boot/frc.json` on the robot).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_reader(File::open(path)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Build the geometric model for the camera at `index`, binding the
    /// configured resolution to the fixed mounting constants.
    pub fn camera_model(&self, index: usize) -> Result<CameraModel, ConfigError> {
        let setup = self
            .cameras
            .get(index)
            .ok_or(ConfigError::MissingCamera {
                index,
                available: self.cameras.len(),
            })?;
        Ok(CameraModel::with_fixed_geometry(setup.width, setup.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG_JSON: &str = r#"{
        "team": 5112,
        "ntmode": "client",
        "cameras": [
            {"name": "cam1", "path": "/dev/video0", "width": 320, "height": 240, "fps": 30},
            {"name": "cam2", "path": "/dev/video1", "width": 640, "height": 480}
        ]
    }"#;

    #[test]
    fn test_parses_robot_config_ignoring_extra_fields() {
        let config = StartupConfig::from_reader(CONFIG_JSON.as_bytes()).unwrap();
        assert_eq!(config.team, 5112);
        assert_eq!(config.cameras.len(), 2);
        assert_eq!(config.cameras[1].width, 640);
    }

    #[test]
    fn test_camera_model_binds_configured_resolution() {
        let config = StartupConfig::from_reader(CONFIG_JSON.as_bytes()).unwrap();
        let model = config.camera_model(0).unwrap();
        assert_eq!((model.width, model.height), (320, 240));
        assert_eq!(model.center_x(), 160.0);
    }

    #[test]
    fn test_missing_camera_is_an_error() {
        let config = StartupConfig::from_reader(CONFIG_JSON.as_bytes()).unwrap();
        assert!(matches!(
            config.camera_model(5),
            Err(ConfigError::MissingCamera { index: 5, available: 2 })
        ));
    }

    #[test]
    fn test_garbage_config_is_fatal() {
        assert!(matches!(
            StartupConfig::from_reader("not json".as_bytes()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        assert!(matches!(
            StartupConfig::load("/nonexistent/frc.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
