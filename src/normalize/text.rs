use super::BODY;
use crate::dataset::Dataset;
use crate::error::{EtlError, Result};
use crate::tokenize::Tokenizer;
use arrow::array::{Array, BooleanArray, StringArray, UInt64Array};
use std::sync::Arc;
use tracing::{info, warn};

/// Name of the column holding token counts for `column`.
pub fn token_count_column(column: &str) -> String {
    format!("n_tokenize_{}", column)
}

/// Remove every `\n` from `body`. Nothing else is touched.
pub fn strip_newlines(dataset: Dataset) -> Result<Dataset> {
    info!("removing new lines from body");
    let stripped = dataset
        .string_column(BODY)?
        .iter()
        .enumerate()
        .map(|(row, body)| {
            body.map(|b| b.replace('\n', ""))
                .ok_or_else(|| EtlError::MissingValue {
                    column: BODY.to_string(),
                    row,
                })
        })
        .collect::<Result<Vec<_>>>()?;

    dataset.with_column(BODY, Arc::new(StringArray::from(stripped)))
}

/// Drop rows with a null `column`, then add `n_tokenize_<column>` holding the
/// number of non-stopword alphabetic tokens in each value.
pub fn tokenize_and_count(
    dataset: Dataset,
    column: &str,
    tokenizer: &Tokenizer,
) -> Result<Dataset> {
    info!(column, language = %tokenizer.language(), "tokenizing column");

    let present = {
        let values = dataset.string_column(column)?;
        BooleanArray::from_iter((0..values.len()).map(|i| Some(values.is_valid(i))))
    };
    let dropped = present.false_count();
    let dataset = if dropped > 0 {
        warn!(column, dropped, "dropping rows with null values");
        dataset.filter(&present)?
    } else {
        dataset
    };

    let counts: UInt64Array = dataset
        .string_column(column)?
        .iter()
        .map(|v| v.map(|text| tokenizer.count(text) as u64))
        .collect();

    dataset.with_column(&token_count_column(column), Arc::new(counts))
}
