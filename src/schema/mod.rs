//! Parquet primitive types and their annotations, as far as decoding pages needs them.
pub mod types;
