use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::catalog_state::CatalogState;
use crate::domain::entities::field::FieldDescriptor;
use crate::domain::entities::service::{RowIndex, ServiceRecord};
use crate::domain::headers::resolve_headers;
use crate::domain::schema::{FieldSchema, RoleOverrides};
use crate::usecase::ports::sheet::{LoadError, RawTable, SheetSource};

pub struct LoadService {
    source: Arc<dyn SheetSource>,
    overrides: RoleOverrides,
}

impl LoadService {
    pub fn new(source: Arc<dyn SheetSource>, overrides: RoleOverrides) -> Self {
        Self { source, overrides }
    }

    pub async fn load(&self) -> Result<CatalogState, LoadError> {
        info!("fetching service catalog");
        let table = match self.source.fetch_table().await {
            Ok(table) => table,
            Err(err) => {
                warn!(error = %err, "service catalog fetch failed");
                return Err(err);
            }
        };
        let catalog = build_catalog(table, &self.overrides)?;
        info!(
            records = catalog.records.len(),
            fields = catalog.schema.fields().len(),
            categories = catalog.categories.len(),
            "service catalog loaded"
        );
        Ok(catalog)
    }
}

fn column_label(label: &str, index: usize) -> String {
    if label.is_empty() {
        format!("Column {}", index + 1)
    } else {
        label.to_string()
    }
}

/// Raw column headers in export order, plus how many leading rows they
/// consumed. Labelled columns win; otherwise the first row supplies labels.
fn raw_headers(table: &RawTable) -> Result<(Vec<FieldDescriptor>, usize), LoadError> {
    if table.columns.iter().any(|column| !column.label.is_empty()) {
        let headers = table
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                FieldDescriptor::at(idx, column_label(&column.label, idx), column.column_type)
            })
            .collect();
        return Ok((headers, 0));
    }

    match table.rows.first() {
        Some(first) if first.iter().any(|cell| cell.is_truthy()) => {
            let headers = first
                .iter()
                .enumerate()
                .map(|(idx, cell)| {
                    let column_type = table
                        .columns
                        .get(idx)
                        .map(|column| column.column_type)
                        .unwrap_or_default();
                    let label = if cell.is_truthy() {
                        cell.as_label()
                    } else {
                        String::new()
                    };
                    FieldDescriptor::at(idx, column_label(&label, idx), column_type)
                })
                .collect();
            Ok((headers, 1))
        }
        _ => Err(LoadError::NoData),
    }
}

/// Turns a raw export into catalog state. Blank rows are dropped first, so
/// row indices count kept rows from sheet row 2.
pub fn build_catalog(table: RawTable, overrides: &RoleOverrides) -> Result<CatalogState, LoadError> {
    if table.columns.is_empty() {
        return Err(LoadError::NoData);
    }
    let (headers, header_rows) = raw_headers(&table)?;

    let mut records = Vec::new();
    let kept_rows = table
        .rows
        .iter()
        .skip(header_rows)
        .filter(|row| row.iter().any(|cell| cell.is_truthy()));
    for (position, row) in kept_rows.enumerate() {
        let sheet_row = u32::try_from(position)
            .map_err(|_| LoadError::Malformed("too many rows".to_string()))?
            + 2;
        let mut record = ServiceRecord::new(Some(RowIndex(sheet_row)));
        let data_cells = &row[..row.len().saturating_sub(1)];
        for (idx, cell) in data_cells.iter().enumerate() {
            let Some(header) = headers.get(idx) else {
                break;
            };
            record.set(header.id.clone(), cell.display(header.column_type));
        }
        records.push(record);
    }

    let schema = FieldSchema::resolve(resolve_headers(&headers), overrides);
    Ok(CatalogState::from_records(schema, records))
}
