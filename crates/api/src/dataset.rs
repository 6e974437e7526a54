//! Dataset CSV Rows
//!
//! Reads one observation out of a headered CSV file laid out like the fire
//! dataset (`X,Y,month,day,FFMC,...,area`).

use feature_engine::{FieldValue, RawRecord, DAY_FIELD, MONTH_FIELD};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// Dataset read errors
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Row {index} out of range: file has {rows} data rows")]
    RowOutOfRange { index: usize, rows: usize },
}

/// Read data row `index` (0-based, header excluded) as a record.
///
/// Month and day stay text; every other cell becomes a number when it parses
/// as one and text otherwise, so a bad cell surfaces as a type error at
/// assembly.
pub fn read_csv_row<R: Read>(reader: R, index: usize) -> Result<RawRecord, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut rows = 0;
    for result in csv_reader.records() {
        let row = result?;
        if rows == index {
            let mut record = RawRecord::new();
            for (name, cell) in headers.iter().zip(row.iter()) {
                record.insert(name, parse_cell(name, cell));
            }
            return Ok(record);
        }
        rows += 1;
    }

    Err(DatasetError::RowOutOfRange { index, rows })
}

/// Read data row `index` from a CSV file on disk
pub fn load_csv_row<P: AsRef<Path>>(path: P, index: usize) -> Result<RawRecord, DatasetError> {
    let file = File::open(path)?;
    read_csv_row(BufReader::new(file), index)
}

fn parse_cell(name: &str, cell: &str) -> FieldValue {
    if name == MONTH_FIELD || name == DAY_FIELD {
        return FieldValue::from(cell);
    }
    match cell.parse::<f64>() {
        Ok(v) => FieldValue::Number(v),
        Err(_) => FieldValue::from(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::test_state;
    use crate::LABEL_FIELD;

    const FIXTURE: &str = "\
X,Y,month,day,FFMC,DMC,DC,ISI,temp,RH,wind,rain,area
7,5,mar,fri,86.2,26.2,94.3,5.1,8.2,51,6.7,0.0,0.0
8,6,oct,tue,90.6,35.4,669.1,6.7,18.0,33,0.9,0.0,12.5
";

    #[test]
    fn test_row_assembles_to_full_width() {
        let record = read_csv_row(FIXTURE.as_bytes(), 1).unwrap();
        assert_eq!(record.get("month"), Some(&FieldValue::from("oct")));
        assert_eq!(record.get("area"), Some(&FieldValue::Number(12.5)));

        let state = test_state();
        let features = state.engine.assemble(&record.without(LABEL_FIELD)).unwrap();
        assert_eq!(features.width(), 29);
        assert_eq!(features.get("month_oct"), Some(1.0));
        assert_eq!(features.get("day_tue"), Some(1.0));
    }

    #[test]
    fn test_label_must_be_dropped() {
        let record = read_csv_row(FIXTURE.as_bytes(), 0).unwrap();
        assert!(test_state().engine.assemble(&record).is_err());
    }

    #[test]
    fn test_row_out_of_range() {
        let err = read_csv_row(FIXTURE.as_bytes(), 2).unwrap_err();
        assert!(matches!(err, DatasetError::RowOutOfRange { index: 2, rows: 2 }));
    }

    #[test]
    fn test_padded_cells_are_trimmed() {
        let csv = "X, month ,day\n 7 , mar ,fri\n";
        let record = read_csv_row(csv.as_bytes(), 0).unwrap();
        assert_eq!(record.get("X"), Some(&FieldValue::Number(7.0)));
        assert_eq!(record.get("month"), Some(&FieldValue::from("mar")));
    }
}
