pub mod json;
pub mod parquet;
