use super::{UID, URL};
use crate::dataset::Dataset;
use crate::error::{EtlError, Result};
use arrow::array::StringArray;
use std::sync::Arc;
use tracing::info;

/// 32-hex-digit MD5 of the UTF-8 bytes of `url`.
pub fn url_uid(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

/// Hash every `url` into `uid` and index the dataset by it.
///
/// Identical urls give identical uids; both rows are kept.
pub fn generate_uid(dataset: Dataset) -> Result<Dataset> {
    info!("generating uids for each row");
    let uids = dataset
        .string_column(URL)?
        .iter()
        .enumerate()
        .map(|(row, url)| {
            url.map(url_uid).ok_or_else(|| EtlError::MissingValue {
                column: URL.to_string(),
                row,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    dataset
        .with_column(UID, Arc::new(StringArray::from(uids)))?
        .set_index(UID)
}
