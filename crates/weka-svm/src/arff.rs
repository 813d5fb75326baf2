//! ARFF serialisation of typed rows.
//!
//! The header and the data section share one quoting rule, the one Weka's
//! own `Utils.quote` applies, so a nominal value listed in the header reads
//! back as the same token in the data.

use std::io::Write;
use std::path::Path;

use crate::error::WekaError;
use crate::types::{AttributeType, Row, Schema, Value};

/// Relation name written at the top of every file.
pub const RELATION: &str = "BlackBoxAuditing";

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s == "?"
        || s.chars().any(|c| {
            matches!(
                c,
                '\n' | '\r' | '\t' | ' ' | '\'' | '"' | '\\' | '%' | ',' | '{' | '}'
            )
        })
}

/// Quote a token the way Weka's ARFF reader expects.
///
/// Plain tokens are returned unchanged. Anything containing whitespace,
/// separators or quotes is wrapped in single quotes with backslash escapes.
pub fn quote(s: &str) -> String {
    if !needs_quotes(s) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '%' => out.push_str("\\%"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Attribute name as written to the header: spaces become underscores.
pub fn attribute_name(name: &str) -> String {
    quote(&name.replace(' ', "_"))
}

fn format_type(kind: &AttributeType) -> String {
    match kind {
        AttributeType::Numeric => "numeric".to_string(),
        AttributeType::Nominal(values) => {
            let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
            format!("{{{}}}", quoted.join(","))
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Missing => "?".to_string(),
        Value::Integer(_) | Value::Real(_) => value.to_string(),
        Value::Nominal(s) => quote(s),
    }
}

/// Write the `@relation`/`@attribute`/`@data` header.
pub fn write_header(mut w: impl Write, schema: &Schema) -> Result<(), WekaError> {
    writeln!(w, "@relation {}", RELATION)?;
    for attr in &schema.attributes {
        writeln!(w, "@attribute {} {}", attribute_name(&attr.name), format_type(&attr.kind))?;
    }
    writeln!(w)?;
    writeln!(w, "@data")?;
    Ok(())
}

/// Write a complete ARFF document to any writer.
pub fn write_arff(mut w: impl Write, schema: &Schema, rows: &[Row]) -> Result<(), WekaError> {
    schema.check_rows(rows)?;
    write_header(&mut w, schema)?;
    for row in rows {
        let line: Vec<String> = row.iter().map(format_value).collect();
        writeln!(w, "{}", line.join(","))?;
    }
    w.flush()?;
    Ok(())
}

/// Write a complete ARFF document to `path`, replacing any existing file.
pub fn write_arff_file(path: &Path, schema: &Schema, rows: &[Row]) -> Result<(), WekaError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    write_arff(writer, schema, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::infer_schema;

    fn render(headers: &[&str], rows: &[Row]) -> String {
        let headers: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let schema = infer_schema(&headers, rows).unwrap();
        let mut buf = Vec::new();
        write_arff(&mut buf, &schema, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn writes_header_and_data() {
        let rows = vec![
            vec![Value::Integer(1), Value::from("A")],
            vec![Value::Integer(51), Value::from("B")],
        ];
        let text = render(&["predictor", "response"], &rows);
        assert_eq!(
            text,
            "@relation BlackBoxAuditing\n\
             @attribute predictor numeric\n\
             @attribute response {A,B}\n\
             \n\
             @data\n\
             1,A\n\
             51,B\n"
        );
    }

    #[test]
    fn spaces_in_attribute_names_become_underscores() {
        let rows = vec![vec![Value::Real(0.5)]];
        let text = render(&["hours per week"], &rows);
        assert!(text.contains("@attribute hours_per_week numeric\n"));
    }

    #[test]
    fn awkward_nominal_values_are_quoted_consistently() {
        let rows = vec![
            vec![Value::from("New York")],
            vec![Value::from("a,b")],
            vec![Value::from("plain")],
        ];
        let text = render(&["city"], &rows);
        assert!(text.contains("@attribute city {'New York','a,b',plain}\n"));
        assert!(text.contains("\n'New York'\n'a,b'\nplain\n"));
    }

    #[test]
    fn missing_values_are_question_marks() {
        let rows = vec![
            vec![Value::Missing, Value::from("A")],
            vec![Value::Real(2.5), Value::Missing],
        ];
        let text = render(&["x", "y"], &rows);
        assert!(text.ends_with("@data\n?,A\n2.5,?\n"));
    }

    #[test]
    fn literal_question_mark_is_quoted() {
        assert_eq!(quote("?"), "'?'");
        assert_eq!(quote(""), "''");
        assert_eq!(quote("it's"), "'it\\'s'");
    }

    #[test]
    fn row_width_mismatch_rejected() {
        let headers = vec!["x".to_string()];
        let schema = infer_schema(&headers, &[]).unwrap();
        let mut buf = Vec::new();
        let err = write_arff(&mut buf, &schema, &[vec![Value::Integer(1), Value::Integer(2)]])
            .unwrap_err();
        assert!(matches!(err, WekaError::Schema(_)));
    }
}
