//! CSV log files recorded by the driver
//!
//! The first row holds the series labels; each following row is one sample.
//! Cells are read as:
//!
//! - plain numbers,
//! - lowercase `true` / `false` (1 / 0),
//! - enum display strings `"name (code)"`, reduced to `code`,
//! - empty cells, kept as NaN so the plot shows a gap.
//!
//! Series are stored column-major: `series[column][row]`.

use std::path::Path;

use crate::error::{Result, ResultExt, StudioError};
use crate::plot::SeriesPartition;

/// A parsed CSV log
#[derive(Debug, Clone, PartialEq)]
pub struct CsvLog {
    pub header: Vec<String>,
    pub series: Vec<Vec<f64>>,
}

impl CsvLog {
    /// Parse CSV text.
    ///
    /// Rejects text with fewer than two rows and any data row with fewer
    /// columns than the header. Columns beyond the header are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut records = reader.records();

        let header: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(String::from).collect(),
            None => {
                return Err(StudioError::MalformedLog(
                    "file is empty, expected a header row and at least one data row".to_string(),
                ))
            }
        };

        let mut series: Vec<Vec<f64>> = vec![Vec::new(); header.len()];
        let mut rows = 0usize;

        for record in records {
            let record = record?;
            rows += 1;
            // Row numbers are 1-based and count the header
            let row_number = rows + 1;

            if record.len() < header.len() {
                return Err(StudioError::MalformedLog(format!(
                    "row {} has {} columns but the header has {}",
                    row_number,
                    record.len(),
                    header.len()
                )));
            }

            for (column, cell) in record.iter().take(header.len()).enumerate() {
                let value = parse_cell(cell).ok_or_else(|| {
                    StudioError::MalformedLog(format!(
                        "row {}, column '{}': cannot read '{}' as a value",
                        row_number, header[column], cell
                    ))
                })?;
                series[column].push(value);
            }
        }

        if rows == 0 {
            return Err(StudioError::MalformedLog(
                "expected a header row and at least one data row".to_string(),
            ));
        }

        tracing::debug!("Parsed log: {} series x {} samples", header.len(), rows);
        Ok(Self { header, series })
    }

    /// Read and parse a log file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(StudioError::from)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&text)
    }

    /// Number of series (header length)
    pub fn series_count(&self) -> usize {
        self.header.len()
    }

    /// Number of samples per series
    pub fn sample_count(&self) -> usize {
        self.series.first().map(Vec::len).unwrap_or(0)
    }

    /// Shared X axis: the sample index
    pub fn x_axis(&self) -> impl Iterator<Item = f64> {
        (0..self.sample_count()).map(|i| i as f64)
    }

    /// Plot points of one series against the sample index
    pub fn points(&self, column: usize) -> Vec<[f64; 2]> {
        self.series
            .get(column)
            .map(|values| {
                self.x_axis()
                    .zip(values.iter())
                    .map(|(x, v)| [x, *v])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Initial partition: one pane with every series
    pub fn initial_partition(&self) -> SeriesPartition {
        SeriesPartition::new(self.series_count())
    }
}

/// Read one cell. `None` when the text is not a recognised value.
pub fn parse_cell(cell: &str) -> Option<f64> {
    match cell {
        "" => return Some(f64::NAN),
        "true" => return Some(1.0),
        "false" => return Some(0.0),
        _ => {}
    }

    if let Ok(value) = cell.parse::<f64>() {
        return Some(if value.is_finite() { value } else { f64::NAN });
    }

    enum_code(cell)
}

/// `"Running (3)"` -> 3
fn enum_code(cell: &str) -> Option<f64> {
    let inner = cell.strip_suffix(')')?;
    let open = inner.rfind('(')?;
    let (name, code) = (inner[..open].trim(), inner[open + 1..].trim());
    if name.is_empty() {
        return None;
    }
    code.parse::<f64>().ok().filter(|c| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_example_log() {
        let log = CsvLog::parse("a,b,c\n5.45,0,true\n5.4,0,false\n0,1,true").unwrap();
        assert_eq!(log.header, vec!["a", "b", "c"]);
        assert_eq!(
            log.series,
            vec![vec![5.45, 5.4, 0.0], vec![0.0, 0.0, 1.0], vec![1.0, 0.0, 1.0]]
        );
        assert_eq!(log.initial_partition().groups(), &[vec![0, 1, 2]]);
    }

    #[test]
    fn test_enum_display_reduced_to_code() {
        let log = CsvLog::parse("state,mode\n\"Running (3)\",Idle (0)\nFault (12),Idle (0)").unwrap();
        assert_eq!(log.series, vec![vec![3.0, 12.0], vec![0.0, 0.0]]);
    }

    #[test]
    fn test_header_only_rejected() {
        let err = CsvLog::parse("a,b,c\n").unwrap_err();
        assert!(matches!(err, StudioError::MalformedLog(_)));
        assert!(CsvLog::parse("").is_err());
    }

    #[test]
    fn test_short_row_rejected() {
        let err = CsvLog::parse("a,b,c\n1,2,3\n4,5").unwrap_err();
        assert!(err.to_string().contains("row 3 has 2 columns but the header has 3"));
    }

    #[test]
    fn test_extra_columns_ignored() {
        let log = CsvLog::parse("a,b\n1,2,3\n4,5,6").unwrap();
        assert_eq!(log.series, vec![vec![1.0, 4.0], vec![2.0, 5.0]]);
    }

    #[test]
    fn test_empty_cell_is_gap() {
        let log = CsvLog::parse("a,b\n1,\n2,3").unwrap();
        assert!(log.series[1][0].is_nan());
        assert_eq!(log.series[1][1], 3.0);
    }

    #[test]
    fn test_unknown_text_rejected() {
        let err = CsvLog::parse("a,b\n1,TRUE").unwrap_err();
        assert!(err.to_string().contains("column 'b'"));
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("-2.5"), Some(-2.5));
        assert_eq!(parse_cell("Homing ( 7 )"), Some(7.0));
        assert_eq!(parse_cell("(7)"), None);
        assert_eq!(parse_cell("Homing (x)"), None);
        assert!(parse_cell("inf").map(f64::is_nan).unwrap_or(false));
    }

    #[test]
    fn test_points_use_sample_index() {
        let log = CsvLog::parse("a\n10\n20").unwrap();
        assert_eq!(log.points(0), vec![[0.0, 10.0], [1.0, 20.0]]);
        assert!(log.points(5).is_empty());
        assert_eq!(log.sample_count(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CsvLog::load("/definitely/not/here.csv").unwrap_err();
        assert_eq!(err.title(), "File error");
    }
}
