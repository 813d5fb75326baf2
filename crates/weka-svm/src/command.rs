//! Command lines for Weka's SMO classifier.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::WekaConfig;
use crate::error::WekaError;

/// Fully qualified name of Weka's SMO classifier.
pub const SMO_CLASS: &str = "weka.classifiers.functions.SMO";

/// A single SMO invocation: `java <classifier> <args>` with the Weka jar on
/// `CLASSPATH`.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoCommand {
    /// Java launcher.
    pub java: PathBuf,
    /// Weka jar appended to the inherited `CLASSPATH`.
    pub weka_jar: PathBuf,
    /// Classifier class run by the JVM, [`SMO_CLASS`] unless changed.
    pub classifier: String,
    /// Arguments after the classifier class name.
    pub args: Vec<OsString>,
}

fn class_arg(class_index: usize) -> OsString {
    // Weka numbers attributes from 1.
    OsString::from((class_index + 1).to_string())
}

impl SmoCommand {
    fn new(config: &WekaConfig) -> Self {
        Self {
            java: config.java.clone(),
            weka_jar: config.weka_jar.clone(),
            classifier: SMO_CLASS.to_string(),
            args: Vec::new(),
        }
    }

    fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Train on `train_arff`, save the model to `model_file`, and print
    /// predictions for the training data.
    ///
    /// `class_index` is the 0-based response column.
    pub fn train(
        config: &WekaConfig,
        train_arff: &Path,
        model_file: &Path,
        class_index: usize,
    ) -> Self {
        let cmd = Self::new(config)
            .arg("-t")
            .arg(train_arff)
            .arg("-d")
            .arg(model_file)
            .arg("-p")
            .arg("0")
            .arg("-c")
            .arg(class_arg(class_index));
        match config.kernel_option() {
            Some(kernel) => cmd.arg("-K").arg(kernel),
            None => cmd,
        }
    }

    /// Load `model_file` and print predictions for `test_arff`.
    pub fn test(
        config: &WekaConfig,
        test_arff: &Path,
        model_file: &Path,
        class_index: usize,
    ) -> Self {
        Self::new(config)
            .arg("-T")
            .arg(test_arff)
            .arg("-l")
            .arg(model_file)
            .arg("-p")
            .arg("0")
            .arg("-c")
            .arg(class_arg(class_index))
    }

    /// `CLASSPATH` for the child: the inherited value with the Weka jar appended.
    pub fn classpath(&self) -> Result<OsString, WekaError> {
        let inherited = std::env::var_os("CLASSPATH").unwrap_or_default();
        let mut entries: Vec<PathBuf> = std::env::split_paths(&inherited)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        entries.push(self.weka_jar.clone());
        std::env::join_paths(entries)
            .map_err(|e| WekaError::Config(format!("invalid CLASSPATH entry: {}", e)))
    }

    /// Build a [`Command`] ready to spawn. No shell is involved.
    pub fn to_command(&self) -> Result<Command, WekaError> {
        let mut command = Command::new(&self.java);
        command
            .env("CLASSPATH", self.classpath()?)
            .arg(&self.classifier)
            .args(&self.args);
        Ok(command)
    }
}

fn shell_quote(arg: &str) -> String {
    if !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+,@".contains(c))
    {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

impl fmt::Display for SmoCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            shell_quote(&self.java.to_string_lossy()),
            shell_quote(&self.classifier)
        )?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}
