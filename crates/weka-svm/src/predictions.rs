//! Parser for the plain-text prediction table Weka prints with `-p 0`.
//!
//! ```text
//! === Predictions on test data ===
//!
//!  inst#     actual  predicted error prediction
//!      1        1:A        1:A       1
//!     50        3:C        2:B   +   1
//! ```
//!
//! Nominal cells are `<1-based index>:<label>`, and a label may contain
//! spaces. The error column holds `+` only on misclassified rows, so
//! everything after `predicted` is optional.

use crate::error::WekaError;

/// Marker that opens the table header.
const HEADER_MARKER: &str = "inst#";

/// One row of the prediction table.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// 1-based instance number as printed by Weka.
    pub instance: usize,
    /// Actual class, `None` when the test row had no class value.
    pub actual: Option<String>,
    /// 1-based index of the predicted class in the ARFF header.
    pub predicted_index: usize,
    /// Predicted class label.
    pub predicted: String,
    /// Whether Weka flagged the row as misclassified.
    pub error: bool,
    /// Confidence of the prediction, when printed.
    pub probability: Option<f64>,
}

fn report_error(line: usize, message: impl Into<String>) -> WekaError {
    WekaError::Report {
        line,
        message: message.into(),
    }
}

fn is_nominal_cell(token: &str) -> bool {
    match token.split_once(':') {
        Some((idx, _)) => !idx.is_empty() && idx.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

fn is_trailing_column(token: &str) -> bool {
    token == "+" || token.trim_start_matches('*').parse::<f64>().is_ok()
}

fn unquote(label: &str) -> String {
    match label.strip_prefix('\'').and_then(|l| l.strip_suffix('\'')) {
        Some(inner) => inner.to_string(),
        None => label.to_string(),
    }
}

/// Split a cell spread over `tokens` (labels may contain spaces) into its
/// index and label.
fn split_nominal(tokens: &[&str], line: usize) -> Result<(usize, String), WekaError> {
    let joined = tokens.join(" ");
    let (idx, label) = joined
        .split_once(':')
        .ok_or_else(|| report_error(line, format!("expected index:label, got: {}", joined)))?;
    let idx: usize = idx
        .parse()
        .map_err(|_| report_error(line, format!("invalid class index: {}", idx)))?;
    Ok((idx, unquote(label)))
}

fn parse_row(text: &str, line: usize) -> Result<Prediction, WekaError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();

    let inst_str = tokens
        .first()
        .ok_or_else(|| report_error(line, "missing instance number"))?;
    let instance: usize = inst_str
        .parse()
        .map_err(|_| report_error(line, format!("invalid instance number: {}", inst_str)))?;

    if tokens.len() < 2 {
        return Err(report_error(line, "missing actual column"));
    }
    if tokens.len() < 3 {
        return Err(report_error(line, "missing predicted column"));
    }

    // Cells are found by their `<index>:` prefix, not by position.
    let predicted_start = (2..tokens.len())
        .find(|&i| is_nominal_cell(tokens[i]))
        .ok_or_else(|| {
            report_error(
                line,
                format!("expected index:label, got: {}", tokens[2..].join(" ")),
            )
        })?;
    let predicted_end = (predicted_start + 1..tokens.len())
        .find(|&i| is_trailing_column(tokens[i]))
        .unwrap_or(tokens.len());

    let actual = if is_nominal_cell(tokens[1]) {
        match split_nominal(&tokens[1..predicted_start], line)? {
            (_, label) if label == "?" => None,
            (_, label) => Some(label),
        }
    } else {
        None
    };
    let (predicted_index, predicted) =
        split_nominal(&tokens[predicted_start..predicted_end], line)?;

    let mut error = false;
    let mut probability = None;
    for token in &tokens[predicted_end..] {
        if *token == "+" {
            error = true;
        } else if probability.is_none() {
            probability = token.trim_start_matches('*').parse::<f64>().ok();
        }
    }

    Ok(Prediction {
        instance,
        actual,
        predicted_index,
        predicted,
        error,
        probability,
    })
}

/// Parse every prediction row from a `-p 0` report.
///
/// Text before the `inst#` header is ignored. The table ends at the first
/// blank line after at least one row, or at end of input.
pub fn parse_predictions(report: &str) -> Result<Vec<Prediction>, WekaError> {
    let mut predictions = Vec::new();
    let mut in_table = false;

    for (idx, raw) in report.lines().enumerate() {
        let line_num = idx + 1;
        let line = raw.trim();

        if !in_table {
            if line.starts_with(HEADER_MARKER) {
                in_table = true;
            }
            continue;
        }

        if line.is_empty() {
            if predictions.is_empty() {
                continue;
            }
            break;
        }

        predictions.push(parse_row(line, line_num)?);
    }

    if !in_table {
        return Err(report_error(0, "no prediction table found"));
    }

    Ok(predictions)
}
