use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::domain::entities::service::ServiceRecord;
use crate::domain::schema::FieldSchema;
use crate::infra::export::csv::export_records_to_csv;

pub struct ExportService {
    file_name: String,
}

impl ExportService {
    pub fn new(sheet_name: &str) -> Self {
        let stem: String = sheet_name
            .chars()
            .map(|ch| if ch.is_alphanumeric() { ch.to_ascii_lowercase() } else { '-' })
            .collect();
        let stem = stem.trim_matches('-');
        let stem = if stem.is_empty() { "services" } else { stem };
        Self {
            file_name: format!("{stem}.csv"),
        }
    }

    pub fn default_file_name(&self) -> &str {
        &self.file_name
    }

    pub fn export_csv(
        &self,
        path: &Path,
        schema: &FieldSchema,
        records: &[&ServiceRecord],
    ) -> Result<usize> {
        let written = export_records_to_csv(path, schema.fields(), records)?;
        info!(rows = written, path = %path.display(), "exported services to csv");
        Ok(written)
    }
}
