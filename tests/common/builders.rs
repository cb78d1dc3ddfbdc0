//! Test data builders for logs and documents

use driver_studio::{SchemaObject, SchemaValue};

/// Builder for CSV log text
pub struct CsvLogBuilder {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvLogBuilder {
    pub fn new(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, cells: &[&str]) -> Self {
        self.rows.push(cells.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Append `count` rows where column `c` of row `r` holds `r * (c + 1)`
    pub fn ramp(mut self, count: usize) -> Self {
        let columns = self.header.len();
        for r in 0..count {
            let row = (0..columns).map(|c| (r * (c + 1)).to_string()).collect();
            self.rows.push(row);
        }
        self
    }

    pub fn build(self) -> String {
        let mut text = self.header.join(",");
        text.push('\n');
        for row in self.rows {
            text.push_str(&row.join(","));
            text.push('\n');
        }
        text
    }
}

/// Small reference document: one flag, one number, one enum, one nested object
pub fn small_reference() -> SchemaObject {
    let nested = SchemaObject::new()
        .with_field("gain", SchemaValue::Number(1.5))
        .with_field("enabled", SchemaValue::Bool(true));

    SchemaObject::new()
        .with_field("mode", SchemaValue::EnumString("COMBINATOR_OR".to_string()))
        .with_field("period", SchemaValue::Number(250.0))
        .with_field("nested", SchemaValue::Object(nested))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_builder() {
        let text = CsvLogBuilder::new(&["a", "b"]).row(&["1", "2"]).ramp(2).build();
        assert_eq!(text, "a,b\n1,2\n0,0\n1,2\n");
    }
}
