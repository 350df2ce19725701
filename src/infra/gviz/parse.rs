use serde::Deserialize;
use serde_json::Value;

use crate::domain::entities::cell::CellValue;
use crate::domain::entities::field::ColumnType;
use crate::usecase::ports::sheet::{LoadError, RawColumn, RawTable};

#[derive(Debug, Deserialize)]
struct ExportEnvelope {
    table: Option<ExportTable>,
}

#[derive(Debug, Deserialize)]
struct ExportTable {
    #[serde(default)]
    cols: Option<Vec<ExportColumn>>,
    #[serde(default)]
    rows: Option<Vec<ExportRow>>,
}

#[derive(Debug, Deserialize)]
struct ExportColumn {
    #[serde(default)]
    label: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExportRow {
    #[serde(default)]
    c: Option<Vec<Option<ExportCell>>>,
}

#[derive(Debug, Deserialize)]
struct ExportCell {
    #[serde(default)]
    v: Option<Value>,
}

/// The export wraps its JSON in a script callback; keep only the text from
/// the first `{` to the last `}`.
pub fn unwrap_payload(body: &str) -> Result<&str, LoadError> {
    let start = body.find('{');
    let end = body.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&body[start..=end]),
        _ => Err(LoadError::Malformed(
            "response does not contain a JSON object".to_string(),
        )),
    }
}

fn cell_value(value: Option<Value>) -> CellValue {
    match value {
        None | Some(Value::Null) => CellValue::Empty,
        Some(Value::Bool(value)) => CellValue::Bool(value),
        Some(Value::Number(number)) => number
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(number.to_string())),
        Some(Value::String(text)) => CellValue::Text(text),
        Some(other) => CellValue::Text(other.to_string()),
    }
}

pub fn parse_export(body: &str) -> Result<RawTable, LoadError> {
    let payload = unwrap_payload(body)?;
    let envelope: ExportEnvelope =
        serde_json::from_str(payload).map_err(|err| LoadError::Malformed(err.to_string()))?;

    let Some(table) = envelope.table else {
        return Err(LoadError::NoData);
    };
    let columns = match table.cols {
        Some(cols) if !cols.is_empty() => cols,
        _ => return Err(LoadError::NoData),
    };

    let columns = columns
        .into_iter()
        .map(|column| RawColumn {
            label: column.label.unwrap_or_default(),
            column_type: ColumnType::from_export(column.kind.as_deref().unwrap_or_default()),
        })
        .collect();

    let rows = table
        .rows
        .unwrap_or_default()
        .into_iter()
        .map(|row| {
            row.c
                .unwrap_or_default()
                .into_iter()
                .map(|cell| cell_value(cell.and_then(|cell| cell.v)))
                .collect()
        })
        .collect();

    Ok(RawTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_payload_strips_callback_wrapper() {
        let body = "/*O_o*/\ngoogle.visualization.Query.setResponse({\"table\":{}});";
        assert_eq!(unwrap_payload(body).unwrap(), "{\"table\":{}}");
    }

    #[test]
    fn unwrap_payload_rejects_text_without_object() {
        assert!(matches!(
            unwrap_payload("<html>quota exceeded</html>"),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn parse_export_requires_columns() {
        let body = "setResponse({\"table\":{\"cols\":[],\"rows\":[]}})";
        assert_eq!(parse_export(body), Err(LoadError::NoData));
        assert_eq!(parse_export("x({\"status\":\"error\"})"), Err(LoadError::NoData));
    }

    #[test]
    fn parse_export_maps_null_cells_to_empty() {
        let body = r#"cb({"table":{"cols":[{"label":"Name","type":"string"},{"label":"Price","type":"number"}],
            "rows":[{"c":[{"v":"Facial"},null]},{"c":[{"v":null},{"v":250}]}]}})"#;
        let table = parse_export(body).unwrap();

        assert_eq!(table.columns[1].column_type, ColumnType::Number);
        assert_eq!(table.rows[0], vec![CellValue::Text("Facial".into()), CellValue::Empty]);
        assert_eq!(table.rows[1], vec![CellValue::Empty, CellValue::Number(250.0)]);
    }
}
