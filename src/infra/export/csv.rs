use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::entities::field::FieldDescriptor;
use crate::domain::entities::service::ServiceRecord;

/// Writes one header row of labels and one row per record, in field order.
pub fn write_records<W: Write>(
    writer: W,
    fields: &[FieldDescriptor],
    records: &[&ServiceRecord],
) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(fields.iter().map(|field| field.label.as_str()))
        .context("failed to write csv header")?;

    for record in records {
        writer
            .write_record(fields.iter().map(|field| record.get(&field.id)))
            .context("failed to write csv record")?;
    }

    writer.flush().context("failed to flush csv output")?;
    Ok(records.len())
}

pub fn export_records_to_csv(
    csv_path: &Path,
    fields: &[FieldDescriptor],
    records: &[&ServiceRecord],
) -> Result<usize> {
    let file = std::fs::File::create(csv_path)
        .with_context(|| format!("failed to create csv: {}", csv_path.display()))?;
    write_records(file, fields, records)
}
