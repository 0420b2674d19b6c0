//! Configuration system
//!
//! A small serde based trait lets any settings struct be loaded from or saved
//! to TOML or RON, chosen by file extension. [`PhysicsConfig`] holds every
//! knob the physics system exposes.

mod physics;

use std::path::Path;

pub use physics::PhysicsConfig;
pub use serde::{Serialize, Deserialize};

/// On-disk formats, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Settings that can be read from and written to TOML or RON files
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load from `path`; the extension selects the format
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::of(path)?;
        let contents = std::fs::read_to_string(path)?;

        match format {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save to `path`; the extension selects the format
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents)?;
        log::debug!("Saved configuration to {}", path.display());
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is outside its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use std::path::PathBuf;

    /// Unique path under the system temp directory
    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rust_physics_{}_{name}", std::process::id()))
    }

    fn tuned() -> PhysicsConfig {
        PhysicsConfig::default()
            .with_gravity_enabled(true)
            .with_gravity(Vec3::new(0.0, -20.0, 0.0))
            .with_global_damping(0.25)
            .with_timestep(1.0 / 240.0, 3)
            .with_constraint_solver(4)
    }

    #[test]
    fn test_toml_file_round_trip() {
        let path = temp_path("physics.toml");
        let config = tuned();

        config.save_to_file(&path).expect("save toml");
        let loaded = PhysicsConfig::load_from_file(&path).expect("load toml");
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_file_round_trip() {
        let path = temp_path("physics.ron");
        let config = tuned();

        config.save_to_file(&path).expect("save ron");
        let text = std::fs::read_to_string(&path).expect("read back");
        let loaded = PhysicsConfig::load_from_file(&path).expect("load ron");
        let _ = std::fs::remove_file(&path);

        assert!(text.contains("use_gravity: true"));
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_format_follows_extension() {
        let path = temp_path("physics.ron");
        std::fs::write(&path, "(max_substeps: 2)").expect("write");

        // Same RON text under a .toml name must not parse
        let misnamed = temp_path("misnamed.toml");
        std::fs::write(&misnamed, "(max_substeps: 2)").expect("write");

        let loaded = PhysicsConfig::load_from_file(&path);
        let wrong = PhysicsConfig::load_from_file(&misnamed);
        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_file(&misnamed);

        assert_eq!(loaded.expect("ron parses").max_substeps, 2);
        assert!(matches!(wrong, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = PhysicsConfig::load_from_file("physics.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));

        let save = PhysicsConfig::default().save_to_file("physics.json");
        assert!(matches!(save, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = PhysicsConfig::load_from_file(temp_path("does_not_exist.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
