use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::arff::attribute_name;
use crate::error::WekaError;

/// A single cell of a data row.
///
/// Integer and real cells make a column numeric; any other value makes it
/// nominal. Missing cells are ignored when inferring a column's type and are
/// written as `?`, Weka's missing-value marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Whole number.
    Integer(i64),
    /// Floating-point number.
    Real(f64),
    /// Categorical value.
    Nominal(String),
    /// No value.
    Missing,
}

impl Value {
    /// Whether this cell is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Real(_))
    }

    /// Whether this cell is missing.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::Nominal(v) => f.write_str(v),
            Value::Missing => f.write_str("?"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Nominal(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Nominal(v)
    }
}

/// A data row: one [`Value`] per header.
pub type Row = Vec<Value>;

/// ARFF type of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    /// `numeric`
    Numeric,
    /// `{a,b,c}`: sorted, deduplicated category names.
    Nominal(Vec<String>),
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Column header as given by the caller.
    pub name: String,
    /// Inferred ARFF type.
    pub kind: AttributeType,
}

/// Ordered attribute list shared by the training and test ARFF files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Attributes in column order.
    pub attributes: Vec<Attribute>,
}

impl Schema {
    /// Number of columns.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// 0-based position of the column named `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    /// Check that every row has one cell per attribute.
    pub fn check_rows(&self, rows: &[Row]) -> Result<(), WekaError> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != self.len() {
                return Err(WekaError::Schema(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    self.len()
                )));
            }
        }
        Ok(())
    }

    /// Make column `col` nominal over the string forms of its values in
    /// `rows`, even when they are all numbers. Class columns need this.
    pub fn force_nominal(&mut self, col: usize, rows: &[Row]) {
        if let Some(attr) = self.attributes.get_mut(col) {
            attr.kind = nominal_column(rows, col);
        }
    }
}

fn nominal_column(rows: &[Row], col: usize) -> AttributeType {
    let categories: BTreeSet<String> = rows
        .iter()
        .map(|row| &row[col])
        .filter(|v| !v.is_missing())
        .map(|v| v.to_string())
        .collect();
    AttributeType::Nominal(categories.into_iter().collect())
}

/// A headered table, as read from CSV.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    /// Column names.
    pub headers: Vec<String>,
    /// Data rows.
    pub rows: Vec<Row>,
}

/// Infer the ARFF type of every column.
///
/// A column whose non-missing values are all integers or reals is numeric,
/// as is an empty or all-missing column. Any other column is nominal over
/// the sorted set of its values' string forms.
pub fn infer_schema(headers: &[String], rows: &[Row]) -> Result<Schema, WekaError> {
    // Compared as written to the ARFF header, where `a b` becomes `a_b`.
    let mut seen: BTreeSet<String> = BTreeSet::new();
    for header in headers {
        if !seen.insert(attribute_name(header)) {
            return Err(WekaError::Schema(format!("duplicate header: {}", header)));
        }
    }

    for (i, row) in rows.iter().enumerate() {
        if row.len() != headers.len() {
            return Err(WekaError::Schema(format!(
                "row {} has {} values, expected {}",
                i,
                row.len(),
                headers.len()
            )));
        }
    }

    let mut attributes = Vec::with_capacity(headers.len());
    for (col, name) in headers.iter().enumerate() {
        let mut values = rows.iter().map(|row| &row[col]).filter(|v| !v.is_missing());
        let kind = if values.all(Value::is_numeric) {
            AttributeType::Numeric
        } else {
            nominal_column(rows, col)
        };
        attributes.push(Attribute {
            name: name.clone(),
            kind,
        });
    }

    Ok(Schema { attributes })
}
