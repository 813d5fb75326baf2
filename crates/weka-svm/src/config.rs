//! Where Weka lives and how it is invoked.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WekaError;

/// Weka jar location on Debian-family systems.
pub const DEFAULT_WEKA_JAR: &str = "/usr/share/java/weka.jar";

/// Puk kernel, used unless a caller asks otherwise.
pub const DEFAULT_KERNEL: &str = "weka.classifiers.functions.supportVector.Puk -O 0.5 -S 7";

/// Settings for running Weka.
///
/// Every field has a default, so a TOML file only needs the keys it
/// overrides:
///
/// ```toml
/// weka_jar = "/opt/weka/weka.jar"
/// work_dir = "scratch"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WekaConfig {
    /// Java launcher.
    pub java: PathBuf,
    /// Weka jar appended to the child's `CLASSPATH`.
    pub weka_jar: PathBuf,
    /// Directory for ARFF, model and report files.
    pub work_dir: PathBuf,
    /// Keep generated files in `work_dir`. When false, each trained model
    /// gets a scratch directory inside `work_dir` that is removed on drop.
    pub keep_files: bool,
    /// SMO `-K` kernel specification. `None` or an empty string leaves
    /// Weka's linear default.
    pub kernel: Option<String>,
}

impl Default for WekaConfig {
    fn default() -> Self {
        Self {
            java: PathBuf::from("java"),
            weka_jar: PathBuf::from(DEFAULT_WEKA_JAR),
            work_dir: PathBuf::from("tmp"),
            keep_files: true,
            kernel: Some(DEFAULT_KERNEL.to_string()),
        }
    }
}

impl WekaConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, WekaError> {
        toml::from_str(text).map_err(|e| WekaError::Config(e.to_string()))
    }

    /// Kernel option to pass to SMO, if any.
    pub fn kernel_option(&self) -> Option<&str> {
        self.kernel.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, WekaError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| WekaError::Config(format!("can't read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }
}
