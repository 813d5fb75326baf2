//! Training and testing SMO models through Weka.
//!
//! [`ModelFactory`] fixes the ARFF schema from all the data that will ever
//! be shown to Weka, so training and test files agree on every nominal
//! attribute. [`ModelFactory::build`] trains a model file; the returned
//! [`ModelVisitor`] tests it on further rows.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tempfile::TempDir;

use crate::arff::write_arff_file;
use crate::command::SmoCommand;
use crate::config::WekaConfig;
use crate::confusion::ConfusionMatrix;
use crate::error::WekaError;
use crate::predictions::{parse_predictions, Prediction};
use crate::runner::{CommandRunner, ProcessRunner};
use crate::types::{infer_schema, AttributeType, Row, Schema};

static NEXT_MODEL: AtomicU64 = AtomicU64::new(1);

fn generate_model_name(prefix: &str) -> String {
    let seq = NEXT_MODEL.fetch_add(1, Ordering::Relaxed);
    format!("{}{}_{}", prefix, Utc::now().timestamp_millis(), seq)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(OsStr::new(suffix));
    PathBuf::from(name)
}

/// Directory holding one model's files.
#[derive(Debug)]
enum WorkDir {
    Kept(PathBuf),
    Scratch(TempDir),
}

impl WorkDir {
    fn create(config: &WekaConfig) -> Result<Self, WekaError> {
        std::fs::create_dir_all(&config.work_dir)?;
        if config.keep_files {
            Ok(WorkDir::Kept(config.work_dir.clone()))
        } else {
            let dir = tempfile::Builder::new()
                .prefix("weka-svm-")
                .tempdir_in(&config.work_dir)?;
            Ok(WorkDir::Scratch(dir))
        }
    }

    fn path(&self) -> &Path {
        match self {
            WorkDir::Kept(path) => path,
            WorkDir::Scratch(dir) => dir.path(),
        }
    }
}

/// Builds SMO models for one dataset and response column.
pub struct ModelFactory {
    headers: Vec<String>,
    schema: Schema,
    response_index: usize,
    model_name: String,
    config: WekaConfig,
    runner: Arc<dyn CommandRunner>,
}

impl ModelFactory {
    /// Prepare a factory for `all_data`, every row that training or testing
    /// will use, predicting the column named `response_header`.
    pub fn new(
        all_data: &[Row],
        headers: &[String],
        response_header: &str,
    ) -> Result<Self, WekaError> {
        let mut schema = infer_schema(headers, all_data)?;
        let response_index = schema
            .index_of(response_header)
            .ok_or_else(|| WekaError::UnknownResponse(response_header.to_string()))?;
        // SMO only predicts nominal classes; 0/1 labels read as integers.
        schema.force_nominal(response_index, all_data);

        Ok(Self {
            headers: headers.to_vec(),
            schema,
            response_index,
            model_name: generate_model_name(""),
            config: WekaConfig::default(),
            runner: Arc::new(ProcessRunner),
        })
    }

    /// Prefix the generated model name, e.g. to tell runs apart in `work_dir`.
    pub fn name_prefix(mut self, prefix: &str) -> Self {
        self.model_name = generate_model_name(prefix);
        self
    }

    /// Replace the whole configuration. Call before [`ModelFactory::kernel`].
    pub fn config(mut self, config: WekaConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the SMO kernel; `None` uses Weka's linear default.
    pub fn kernel(mut self, kernel: Option<&str>) -> Self {
        self.config.kernel = kernel.map(String::from);
        self
    }

    /// Use `runner` instead of spawning Weka directly.
    pub fn runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Arc::new(runner);
        self
    }

    /// Name used for this factory's model files.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Column headers, in order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Schema shared by every ARFF file this factory writes.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// 0-based index of the response column.
    pub fn response_index(&self) -> usize {
        self.response_index
    }

    /// Active configuration.
    pub fn settings(&self) -> &WekaConfig {
        &self.config
    }

    /// The training and test commands [`ModelFactory::build`] and
    /// [`ModelVisitor::test`] would run with files kept in `work_dir`.
    pub fn planned_commands(&self) -> [SmoCommand; 2] {
        let model_file = self
            .config
            .work_dir
            .join(format!("SVM_{}.model", self.model_name));
        [
            SmoCommand::train(
                &self.config,
                &with_suffix(&model_file, ".train.arff"),
                &model_file,
                self.response_index,
            ),
            SmoCommand::test(
                &self.config,
                &with_suffix(&model_file, ".test.arff"),
                &model_file,
                self.response_index,
            ),
        ]
    }

    /// Train an SMO model on `train_set`.
    ///
    /// Writes `SVM_<name>.model.train.arff` to the work directory and has
    /// Weka save the fitted model as `SVM_<name>.model` next to it.
    pub fn build(&self, train_set: &[Row]) -> Result<ModelVisitor, WekaError> {
        self.schema.check_rows(train_set)?;

        let work_dir = WorkDir::create(&self.config)?;
        let model_file = work_dir
            .path()
            .join(format!("SVM_{}.model", self.model_name));
        let train_arff = with_suffix(&model_file, ".train.arff");
        write_arff_file(&train_arff, &self.schema, train_set)?;

        crate::info(&format!(
            "training SMO model {} on {} rows",
            self.model_name,
            train_set.len()
        ));
        let command = SmoCommand::train(&self.config, &train_arff, &model_file, self.response_index);
        let output = self.runner.run(&command)?;
        tracing::debug!(bytes = output.len(), "training finished");

        Ok(ModelVisitor {
            model_file,
            schema: self.schema.clone(),
            response_index: self.response_index,
            config: self.config.clone(),
            runner: Arc::clone(&self.runner),
            _work_dir: work_dir,
        })
    }
}

/// A trained SMO model file and the means to test it.
pub struct ModelVisitor {
    model_file: PathBuf,
    schema: Schema,
    response_index: usize,
    config: WekaConfig,
    runner: Arc<dyn CommandRunner>,
    // Held so a scratch directory outlives the model file inside it.
    _work_dir: WorkDir,
}

impl ModelVisitor {
    /// Path of the model file Weka wrote.
    pub fn model_file(&self) -> &Path {
        &self.model_file
    }

    /// 0-based index of the response column.
    pub fn response_index(&self) -> usize {
        self.response_index
    }

    fn resolve_label(&self, prediction: &Prediction) -> String {
        match &self.schema.attributes[self.response_index].kind {
            AttributeType::Nominal(categories)
                if (1..=categories.len()).contains(&prediction.predicted_index) =>
            {
                categories[prediction.predicted_index - 1].clone()
            }
            _ => prediction.predicted.clone(),
        }
    }

    /// Predicted response label for every row of `test_set`, in order.
    ///
    /// Writes `<model>.test.arff`, runs Weka on it and keeps the raw report
    /// as `<model>.test.arff.out`.
    pub fn predict(&self, test_set: &[Row]) -> Result<Vec<String>, WekaError> {
        self.schema.check_rows(test_set)?;

        let test_arff = with_suffix(&self.model_file, ".test.arff");
        write_arff_file(&test_arff, &self.schema, test_set)?;

        let command = SmoCommand::test(&self.config, &test_arff, &self.model_file, self.response_index);
        let report = self.runner.run(&command)?;
        std::fs::write(with_suffix(&test_arff, ".out"), &report)?;

        let predictions = parse_predictions(&report)?;
        if predictions.len() != test_set.len() {
            return Err(WekaError::PredictionCount {
                expected: test_set.len(),
                actual: predictions.len(),
            });
        }

        Ok(predictions.iter().map(|p| self.resolve_label(p)).collect())
    }

    /// Test the model on `test_set` and tally actual against predicted labels.
    pub fn test(&self, test_set: &[Row]) -> Result<ConfusionMatrix, WekaError> {
        let predicted = self.predict(test_set)?;
        let actual: Vec<String> = test_set
            .iter()
            .map(|row| row[self.response_index].to_string())
            .collect();
        let matrix = ConfusionMatrix::from_pairs(&actual, &predicted)?;
        crate::info(&format!(
            "tested {} rows, {} correct",
            matrix.total(),
            matrix.correct()
        ));
        Ok(matrix)
    }
}
