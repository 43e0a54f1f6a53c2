//! Parquet output writer.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow_array::{RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;

use crate::core::models::MessageRecord;
use crate::error::Result;

/// Builds an Arrow record batch with the three snapshot columns.
pub fn record_batch(records: &[MessageRecord]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(
        MessageRecord::columns()
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, false))
            .collect::<Vec<_>>(),
    ));

    let kinds = StringArray::from_iter_values(records.iter().map(|r| r.kind.as_str()));
    let contents = StringArray::from_iter_values(records.iter().map(|r| r.content.as_str()));
    let comments = StringArray::from_iter_values(records.iter().map(|r| r.comments.as_str()));

    let batch = RecordBatch::try_new(
        schema,
        vec![Arc::new(kinds), Arc::new(contents), Arc::new(comments)],
    )?;
    Ok(batch)
}

/// Writes records to a `.parquet` file.
///
/// # Format
/// - Columns: `Type`, `Content`, `Comment`, all non-null UTF-8
/// - One row group, default compression
/// - An empty record list produces a valid file with zero rows
pub fn write_parquet(records: &[MessageRecord], path: &Path) -> Result<()> {
    let batch = record_batch(records)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}
