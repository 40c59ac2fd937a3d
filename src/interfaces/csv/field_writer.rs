use crate::domain::field::FieldMap;
use crate::error::Result;
use std::io::Write;

/// Writes a field map as `field,value` CSV rows in key order.
pub struct FieldWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> FieldWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_fields(&mut self, fields: &FieldMap) -> Result<()> {
        self.writer.write_record(["field", "value"])?;
        for (field, value) in fields {
            self.writer.write_record([field.as_str(), value.to_string().as_str()])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
