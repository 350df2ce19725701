use crate::domain::entities::field::ColumnType;
use crate::domain::format::{format_js_number, format_locale_number};

/// A single cell value from the spreadsheet export.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Mirrors spreadsheet-script truthiness: empty text, zero and `false`
    /// count as blank.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Bool(value) => *value,
            CellValue::Number(value) => *value != 0.0 && !value.is_nan(),
            CellValue::Text(value) => !value.is_empty(),
        }
    }

    /// Text used for header labels taken from the first data row.
    pub fn as_label(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(value) => value.to_string(),
            CellValue::Number(value) => format_js_number(*value),
            CellValue::Text(value) => value.clone(),
        }
    }

    /// Display text for a record field. Number-typed columns get thousands
    /// separators, including numeric text stored in such columns. Blank and
    /// boolean cells in those columns coerce to `0`/`1`.
    pub fn display(&self, column_type: ColumnType) -> String {
        match (self, column_type) {
            (CellValue::Number(value), ColumnType::Number) => format_locale_number(*value),
            (CellValue::Empty, ColumnType::Number) => format_locale_number(0.0),
            (CellValue::Bool(value), ColumnType::Number) => {
                format_locale_number(if *value { 1.0 } else { 0.0 })
            }
            (CellValue::Text(text), ColumnType::Number) if text.trim().is_empty() => {
                format_locale_number(0.0)
            }
            (CellValue::Text(text), ColumnType::Number) => match text.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => format_locale_number(value),
                _ => text.clone(),
            },
            (other, _) => other.as_label(),
        }
    }
}
