use std::process::ExitStatus;

/// Errors returned by weka-svm operations.
#[derive(Debug, thiserror::Error)]
pub enum WekaError {
    /// Rows and headers disagree on shape.
    #[error("schema error: {0}")]
    Schema(String),

    /// The response column is not one of the headers.
    #[error("unknown response header: {0}")]
    UnknownResponse(String),

    /// A CSV input could not be read.
    #[error("csv error at line {line}: {message}")]
    Csv {
        /// 1-based line number, header included.
        line: usize,
        /// Description of the failure.
        message: String,
    },

    /// The Weka process could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Executable that failed to start.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The Weka process exited unsuccessfully.
    #[error("weka exited with {status}: {stderr}")]
    CommandFailed {
        /// Exit status of the child.
        status: ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The prediction report could not be parsed.
    #[error("prediction report error at line {line}: {message}")]
    Report {
        /// 1-based line number within the report.
        line: usize,
        /// Description of the parse failure.
        message: String,
    },

    /// Weka returned a different number of predictions than test rows.
    #[error("expected {expected} predictions, weka reported {actual}")]
    PredictionCount {
        /// Number of rows in the test set.
        expected: usize,
        /// Number of predictions parsed from the report.
        actual: usize,
    },

    /// A configuration file could not be used.
    #[error("config error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for WekaError {
    fn from(err: csv::Error) -> Self {
        let line = err
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(0);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => WekaError::Io(io),
            _ => WekaError::Csv { line, message },
        }
    }
}
