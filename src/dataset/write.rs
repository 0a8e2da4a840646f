use crate::dataset::Dataset;
use crate::error::Result;
use arrow::csv::WriterBuilder;
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use std::{fs::File, path::Path};
use tracing::{info, instrument};

/// Write `dataset` as CSV with a header row, index column first.
#[instrument(level = "info", skip(dataset, path), fields(path = %path.as_ref().display()))]
pub fn write_csv(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let batch = dataset.to_output_batch()?;
    let file = File::create(path.as_ref())?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(&batch)?;
    info!(rows = batch.num_rows(), "wrote csv");
    Ok(())
}

/// Write `dataset` as a single Snappy-compressed Parquet file, index column first.
#[instrument(level = "info", skip(dataset, path), fields(path = %path.as_ref().display()))]
pub fn write_parquet(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let batch = dataset.to_output_batch()?;
    let file = File::create(path.as_ref())?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    info!(rows = batch.num_rows(), "wrote parquet");
    Ok(())
}

/// Pick the writer from the extension: `.parquet` gets Parquet, anything else CSV.
pub fn write_dataset(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("parquet") => write_parquet(dataset, path),
        _ => write_csv(dataset, path),
    }
}
