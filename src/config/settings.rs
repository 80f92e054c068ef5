// file: src/config/settings.rs
// version: 1.0.0
// guid: 345008fe-93ad-44d5-8668-6e1416488729

//! Tool settings shared by every command

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_IMAGE: &str = "ghcr.io/kore3lab/koreon:latest";
pub const DEFAULT_IMAGE_NAME: &str = "koreonctl";
pub const DEFAULT_CONFIG_FILE: &str = "koreon.toml";
pub const DEFAULT_CONFIG_SUB_DIR: &str = "work";
pub const IMAGE_ARCHIVE: &str = "koreon-images.tar.gz";

/// Settings controlling how the executor invocation is assembled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Executor container image
    pub image: String,
    /// Binary inside the image, also used as the container name
    pub image_name: String,
    /// Name of the provisioning document inside the work directory
    pub config_file: String,
    /// Mount point of the work directory inside the container, relative to `/`
    pub config_sub_dir: String,
    /// Host directory holding the provisioning document
    pub work_dir: PathBuf,
    /// Optional support catalog replacing the built-in one
    pub catalog: Option<PathBuf>,
}

impl Settings {
    /// Path of the provisioning document
    pub fn config_path(&self) -> PathBuf {
        self.work_dir.join(&self.config_file)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.to_string(),
            image_name: DEFAULT_IMAGE_NAME.to_string(),
            config_file: DEFAULT_CONFIG_FILE.to_string(),
            config_sub_dir: DEFAULT_CONFIG_SUB_DIR.to_string(),
            work_dir: PathBuf::from("."),
            catalog: None,
        }
    }
}
