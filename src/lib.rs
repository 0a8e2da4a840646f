pub mod dataset;
pub mod error;
pub mod normalize;
pub mod orchestrate;
pub mod stage;
pub mod tokenize;
pub mod transform;

pub use dataset::Dataset;
pub use error::{EtlError, Result};
