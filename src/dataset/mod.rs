// src/dataset/mod.rs
pub mod load;
pub mod write;

pub use load::read_csv;
pub use write::{write_csv, write_dataset, write_parquet};

use crate::error::{EtlError, Result};
use arrow::{
    array::{ArrayRef, BooleanArray, StringArray},
    compute::filter_record_batch,
    datatypes::{Field, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

/// An in-memory table of scraped articles.
///
/// Rows keep their load order. Steps either replace a column in place or
/// append a new one at the end; `index` names the column that identifies
/// rows once `set_index` has been called.
#[derive(Debug, Clone)]
pub struct Dataset {
    batch: RecordBatch,
    index: Option<String>,
}

impl Dataset {
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch, index: None }
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn index_column(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| EtlError::MissingColumn(name.to_string()))
    }

    /// Borrow `name` as a UTF-8 column.
    pub fn string_column(&self, name: &str) -> Result<&StringArray> {
        self.column(name)?
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| EtlError::ColumnType {
                column: name.to_string(),
                expected: "string",
            })
    }

    /// Replace `name` if present, otherwise append it as the last column.
    pub fn with_column(self, name: &str, values: ArrayRef) -> Result<Self> {
        let schema = self.batch.schema();
        let mut fields: Vec<Field> = schema.fields().iter().map(|f| (**f).clone()).collect();
        let mut cols: Vec<ArrayRef> = self.batch.columns().to_vec();
        let field = Field::new(name, values.data_type().clone(), true);

        match schema.index_of(name) {
            Ok(i) => {
                fields[i] = field;
                cols[i] = values;
            }
            Err(_) => {
                fields.push(field);
                cols.push(values);
            }
        }

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), cols)?;
        Ok(Self {
            batch,
            index: self.index,
        })
    }

    /// Make `name` the row identifier. Rows are neither dropped nor reordered.
    pub fn set_index(self, name: &str) -> Result<Self> {
        self.column(name)?;
        Ok(Self {
            batch: self.batch,
            index: Some(name.to_string()),
        })
    }

    /// Keep only the rows where `mask` is true.
    pub fn filter(self, mask: &BooleanArray) -> Result<Self> {
        let batch = filter_record_batch(&self.batch, mask)?;
        Ok(Self {
            batch,
            index: self.index,
        })
    }

    /// Values of the index column, if one has been set.
    pub fn index_values(&self) -> Result<Option<Vec<Option<&str>>>> {
        match &self.index {
            Some(name) => Ok(Some(self.string_column(name)?.iter().collect())),
            None => Ok(None),
        }
    }

    /// The table with the index column moved to the front, the way it is written out.
    pub fn to_output_batch(&self) -> Result<RecordBatch> {
        let Some(index) = &self.index else {
            return Ok(self.batch.clone());
        };
        let schema = self.batch.schema();
        let index_pos = schema
            .index_of(index)
            .map_err(|_| EtlError::MissingColumn(index.clone()))?;
        let order: Vec<usize> = std::iter::once(index_pos)
            .chain((0..schema.fields().len()).filter(|&i| i != index_pos))
            .collect();
        Ok(self.batch.project(&order)?)
    }
}
