//! Loading headered CSV tables into typed rows.

use std::io::Read;
use std::path::Path;

use crate::error::WekaError;
use crate::types::{Dataset, Value};

/// Type a raw CSV cell.
///
/// Integers win over reals, so `3` is an integer and `3.0` a real. Empty
/// cells and `?` are missing. Everything else is nominal.
pub fn parse_value(field: &str) -> Value {
    let field = field.trim();
    if field.is_empty() || field == "?" {
        return Value::Missing;
    }
    if let Ok(v) = field.parse::<i64>() {
        return Value::Integer(v);
    }
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Value::Real(v),
        _ => Value::Nominal(field.to_string()),
    }
}

/// Load a dataset from a CSV file whose first record names the columns.
pub fn load_dataset(path: &Path) -> Result<Dataset, WekaError> {
    let file = std::fs::File::open(path)?;
    load_dataset_from_reader(std::io::BufReader::new(file))
}

/// Load a dataset from any reader producing headered CSV.
pub fn load_dataset_from_reader(reader: impl Read) -> Result<Dataset, WekaError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();
    if headers.is_empty() {
        return Err(WekaError::Csv {
            line: 1,
            message: "missing header record".into(),
        });
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(parse_value).collect());
    }

    Ok(Dataset { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("data")
    }

    #[test]
    fn parse_value_types_cells() {
        assert_eq!(parse_value("42"), Value::Integer(42));
        assert_eq!(parse_value("-3"), Value::Integer(-3));
        assert_eq!(parse_value("0.25"), Value::Real(0.25));
        assert_eq!(parse_value("1e3"), Value::Real(1000.0));
        assert_eq!(parse_value("A"), Value::Nominal("A".into()));
        assert_eq!(parse_value(""), Value::Missing);
        assert_eq!(parse_value("?"), Value::Missing);
        assert_eq!(parse_value("NaN"), Value::Nominal("NaN".into()));
    }

    #[test]
    fn load_from_reader() {
        let input = b"age,city,label\n34,Paris,yes\n51.5,,no\n";
        let dataset = load_dataset_from_reader(&input[..]).unwrap();
        assert_eq!(dataset.headers, vec!["age", "city", "label"]);
        assert_eq!(dataset.rows.len(), 2);
        assert_eq!(
            dataset.rows[1],
            vec![Value::Real(51.5), Value::Missing, Value::from("no")]
        );
    }

    #[test]
    fn ragged_record_reports_line() {
        let input = b"a,b\n1,2\n3\n";
        let err = load_dataset_from_reader(&input[..]).unwrap_err();
        match err {
            WekaError::Csv { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn load_fixture() {
        let dataset = load_dataset(&data_dir().join("threshold_train.csv")).unwrap();
        assert_eq!(dataset.headers, vec!["predictor", "response"]);
        assert_eq!(dataset.rows.len(), 98);
        assert_eq!(dataset.rows[0], vec![Value::Integer(1), Value::from("A")]);
        assert_eq!(dataset.rows[97], vec![Value::Integer(99), Value::from("B")]);
    }
}
