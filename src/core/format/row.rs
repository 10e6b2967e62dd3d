//! Consent record to CSV row
//!
//! Every column goes through the same ordered rules:
//!
//! 1. structured raw value (object, array, `null`): compact JSON text
//! 2. the column's own rule from [`Column::rule`] (`date` reads `createdAt`)
//! 3. boolean: `1` / `0`
//! 4. `value` column: stringified, a missing field becomes `undefined`
//!
//! Text cells then have `;` replaced by `,` so the delimiter stays
//! unambiguous. Numbers and coerced booleans are written as-is.

use crate::domain::ConsentRecord;
use serde_json::{Number, Value};

/// Field delimiter of the export file
pub const DELIMITER: char = ';';

/// Output columns, in file order
pub const COLUMNS: [Column; 8] = [
    Column::ProjectId,
    Column::Token,
    Column::Collection,
    Column::Identifier,
    Column::Accept,
    Column::Date,
    Column::Value,
    Column::Preferences,
];

/// One column of the export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    ProjectId,
    Token,
    Collection,
    Identifier,
    Accept,
    Date,
    Value,
    Preferences,
}

/// Column-specific coercion, applied after the structured-value check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRule {
    /// No column-specific handling
    Plain,
    /// Cell is taken from another field of the record
    SourceField(&'static str),
    /// Non-boolean values are stringified, including missing ones
    Stringify,
}

impl Column {
    /// Header name, also the record field the raw value is read from
    pub fn name(self) -> &'static str {
        match self {
            Column::ProjectId => "projectId",
            Column::Token => "token",
            Column::Collection => "collection",
            Column::Identifier => "identifier",
            Column::Accept => "accept",
            Column::Date => "date",
            Column::Value => "value",
            Column::Preferences => "preferences",
        }
    }

    /// Coercion table
    pub fn rule(self) -> ColumnRule {
        match self {
            Column::Date => ColumnRule::SourceField("createdAt"),
            Column::Value => ColumnRule::Stringify,
            _ => ColumnRule::Plain,
        }
    }
}

/// Rendered cell before joining
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    /// Text, subject to delimiter escaping
    Text(String),
    /// Numeric output, written verbatim
    Number(String),
    /// Missing value
    Empty,
}

impl Cell {
    fn render(self) -> String {
        match self {
            Cell::Text(text) => text.replace(DELIMITER, ","),
            Cell::Number(number) => number,
            Cell::Empty => String::new(),
        }
    }
}

/// Header line of the export file (no trailing newline)
pub fn header_row() -> String {
    COLUMNS
        .iter()
        .map(|column| column.name())
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
}

/// Formats one consent record as a `;`-joined line (no trailing newline)
///
/// # Example
///
/// ```
/// use consent_export::core::format::format_row;
/// use consent_export::domain::ConsentRecord;
/// use serde_json::json;
///
/// let record = ConsentRecord::try_from(json!({
///     "projectId": "p1",
///     "token": "t1",
///     "collection": "cookies",
///     "accept": true,
///     "createdAt": "2021-06-15T00:00:00Z",
///     "value": "ok",
///     "preferences": { "a": 1 }
/// })).unwrap();
///
/// assert_eq!(
///     format_row(&record),
///     r#"p1;t1;cookies;;1;2021-06-15T00:00:00Z;ok;{"a":1}"#
/// );
/// ```
pub fn format_row(record: &ConsentRecord) -> String {
    COLUMNS
        .iter()
        .map(|&column| format_cell(record, column).render())
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
}

fn format_cell(record: &ConsentRecord, column: Column) -> Cell {
    let raw = record.get(column.name());

    if let Some(structured) = raw.filter(|v| is_structured(v)) {
        return Cell::Text(structured.to_string());
    }

    match column.rule() {
        ColumnRule::SourceField(field) => return scalar_cell(record.get(field)),
        ColumnRule::Plain | ColumnRule::Stringify => {}
    }

    if let Some(Value::Bool(flag)) = raw {
        return Cell::Number(if *flag { "1" } else { "0" }.to_string());
    }

    if column.rule() == ColumnRule::Stringify {
        return Cell::Text(match raw {
            None => "undefined".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => number_text(n),
            Some(other) => other.to_string(),
        });
    }

    scalar_cell(raw)
}

/// Renders a value with no column-specific coercion
fn scalar_cell(value: Option<&Value>) -> Cell {
    match value {
        None | Some(Value::Null) => Cell::Empty,
        Some(Value::String(s)) => Cell::Text(s.clone()),
        Some(Value::Number(n)) => Cell::Number(number_text(n)),
        Some(Value::Bool(b)) => Cell::Text(b.to_string()),
        Some(structured) => Cell::Text(structured.to_string()),
    }
}

fn is_structured(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_) | Value::Null)
}

/// Decimal text of a number
///
/// Integers print as-is. Floats use the shortest round-trip digits laid out
/// like a browser would: plain notation from 1e-6 up to below 1e21
/// (`3.0` -> `3`, `1e16` -> `10000000000000000`), exponent form with an
/// explicit sign outside it (`1e+21`, `1.5e-7`).
fn number_text(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(f) => float_text(f),
        None => number.to_string(),
    }
}

fn float_text(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }

    let scientific = format!("{:e}", f.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return f.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return f.to_string();
    };

    // value = 0.DIGITS * 10^point
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let len = digits.len() as i32;
    let point = exponent + 1;

    let body = if len <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - len) as usize))
    } else if 0 < point && point <= 21 {
        let (whole, fraction) = digits.split_at(point as usize);
        format!("{}.{}", whole, fraction)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let (first, rest) = digits.split_at(1);
        let sign = if exponent < 0 { '-' } else { '+' };
        if rest.is_empty() {
            format!("{}e{}{}", first, sign, exponent.abs())
        } else {
            format!("{}.{}e{}{}", first, rest, sign, exponent.abs())
        }
    };

    if f < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}
