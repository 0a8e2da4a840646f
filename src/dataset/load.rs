use crate::dataset::Dataset;
use crate::error::{EtlError, Result};
use arrow::{
    compute::concat_batches,
    csv::{reader::Format, ReaderBuilder},
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
};
use regex::Regex;
use std::{
    fs::File,
    io::{Seek, SeekFrom},
    path::Path,
    sync::Arc,
};
use tracing::{debug, info, instrument};

/// Read a CSV file with a header row into a [`Dataset`].
///
/// Every column is loaded as nullable UTF-8 and empty fields become nulls.
/// Any unreadable or malformed input aborts the load.
#[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    info!("reading file {}", path.display());

    let load_err = |source: ArrowError| EtlError::Load {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path)?;
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, Some(0))
        .map_err(load_err)?;
    file.seek(SeekFrom::Start(0))?;

    // Text columns only; typing happens in the normalizer steps.
    let schema = Arc::new(Schema::new(
        inferred
            .fields()
            .iter()
            .map(|f| Field::new(f.name(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));
    debug!(columns = schema.fields().len(), "header parsed");

    let null_regex = Regex::new("^$").expect("empty-field pattern is valid");
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_null_regex(null_regex)
        .build(file)
        .map_err(load_err)?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(load_err)?;
    let batch = concat_batches(&schema, &batches).map_err(load_err)?;

    info!(rows = batch.num_rows(), "file loaded");
    Ok(Dataset::new(batch))
}
