//! # weka-svm
//!
//! Train and evaluate [Weka](https://www.cs.waikato.ac.nz/ml/weka/) SMO
//! support vector classifiers from Rust.
//!
//! Nothing here fits a model. Rows are serialised to ARFF, Weka's
//! `weka.classifiers.functions.SMO` is run as a child process, and its
//! `-p 0` prediction report is parsed back into a [`ConfusionMatrix`].
//!
//! ```no_run
//! use weka_svm::{ModelFactory, Value};
//!
//! let headers = vec!["predictor".to_string(), "response".to_string()];
//! let train: Vec<Vec<Value>> = (1..50)
//!     .map(|i| vec![Value::Integer(i), Value::from("A")])
//!     .collect();
//! let factory = ModelFactory::new(&train, &headers, "response")?;
//! let model = factory.build(&train)?;
//! let matrix = model.test(&train)?;
//! println!("{}", matrix);
//! # Ok::<(), weka_svm::WekaError>(())
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

pub mod arff;
pub mod command;
pub mod config;
pub mod confusion;
pub mod error;
pub mod io;
pub mod metrics;
pub mod model;
pub mod predictions;
pub mod runner;
pub mod types;

pub use config::WekaConfig;
pub use confusion::ConfusionMatrix;
pub use error::WekaError;
pub use model::{ModelFactory, ModelVisitor};
pub use types::*;

static QUIET: AtomicBool = AtomicBool::new(false);

/// Silence progress messages emitted through [`info`].
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Emit a progress message unless quiet mode is on.
pub fn info(message: &str) {
    if !QUIET.load(Ordering::Relaxed) {
        tracing::info!("{}", message);
    }
}
