// src/normalize/mod.rs
//! Column-level cleaning steps. Each takes a [`Dataset`] by value and
//! returns it with one change applied.

pub mod text;
pub mod uid;
pub mod link;

pub use text::{strip_newlines, token_count_column, tokenize_and_count};
pub use uid::{generate_uid, url_uid};
pub use link::{extract_host, fill_missing_titles, host_of, title_from_url};

use crate::dataset::Dataset;
use crate::error::Result;
use arrow::array::StringArray;
use std::sync::Arc;
use tracing::info;

pub const URL: &str = "url";
pub const TITLE: &str = "title";
pub const BODY: &str = "body";
pub const HOST: &str = "host";
pub const NEWSPAPER_UID: &str = "newspaper_uid";
pub const UID: &str = "uid";

/// Set `newspaper_uid` to `uid` on every row.
pub fn add_newspaper_uid(dataset: Dataset, uid: &str) -> Result<Dataset> {
    info!("filling newspaper column with {}", uid);
    let values = StringArray::from(vec![uid; dataset.num_rows()]);
    dataset.with_column(NEWSPAPER_UID, Arc::new(values))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use arrow::{
        datatypes::{DataType, Field, Schema},
        record_batch::RecordBatch,
    };

    /// Build a url/title/body dataset from optional string triples.
    pub fn articles(rows: &[(Option<&str>, Option<&str>, Option<&str>)]) -> Dataset {
        let schema = Schema::new(vec![
            Field::new(URL, DataType::Utf8, true),
            Field::new(TITLE, DataType::Utf8, true),
            Field::new(BODY, DataType::Utf8, true),
        ]);
        let urls: StringArray = rows.iter().map(|r| r.0).collect();
        let titles: StringArray = rows.iter().map(|r| r.1).collect();
        let bodies: StringArray = rows.iter().map(|r| r.2).collect();
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(urls), Arc::new(titles), Arc::new(bodies)],
        )
        .unwrap();
        Dataset::new(batch)
    }
}
