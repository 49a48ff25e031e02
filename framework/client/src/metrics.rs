use serde_json::{Map, Number, Value};

use crate::error::MetricsParseError;

/// Convert an exposition-format metrics payload into a flat JSON object.
///
/// Comment lines (`# HELP`, `# TYPE`) and blank lines are skipped. Every
/// data line contributes one member keyed by the full series name, label set
/// included. A later duplicate of a series replaces the earlier value. An
/// optional trailing timestamp on a data line is ignored.
pub fn convert_metrics(raw: &str) -> Result<Value, MetricsParseError> {
    let mut converted = Map::new();

    for (index, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (series, value) = parse_data_line(line).ok_or_else(|| MetricsParseError {
            line_number: index + 1,
            line: line.to_string(),
        })?;

        converted.insert(series.to_string(), value);
    }

    Ok(Value::Object(converted))
}

fn parse_data_line(line: &str) -> Option<(&str, Value)> {
    // The series name may contain whitespace inside a label set, e.g.
    // `http_requests{uri="/a b"} 4.0`, so split after the closing brace when
    // there is one and on the first whitespace otherwise.
    let name_end = match line.rfind('}') {
        Some(brace) => brace + 1,
        None => line.find(char::is_whitespace)?,
    };

    let (series, rest) = line.split_at(name_end);
    let mut fields = rest.split_whitespace();
    let value = parse_value(fields.next()?)?;

    // At most one further field, the timestamp.
    if fields.next().is_some() && fields.next().is_some() {
        return None;
    }

    Some((series, value))
}

fn parse_value(raw: &str) -> Option<Value> {
    if let Ok(n) = raw.parse::<i64>() {
        return Some(Value::from(n));
    }

    let parsed = raw.parse::<f64>().ok()?;
    // NaN and the infinities have no JSON number form, keep them as text.
    Some(
        Number::from_f64(parsed)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(raw.to_string())),
    )
}
