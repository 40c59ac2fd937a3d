//! CSV adapters for field maps laid out as `field,value` rows.

pub mod field_reader;
pub mod field_writer;
