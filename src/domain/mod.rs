//! Gateway vocabulary: field values, enumerations, date rendering and the
//! transport port.

pub mod canonical;
pub mod enums;
pub mod field;
pub mod ports;
