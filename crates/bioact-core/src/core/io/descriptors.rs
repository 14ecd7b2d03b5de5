use crate::core::models::descriptors::{DescriptorMatrix, MatrixShapeError};
use crate::core::models::features::FeatureSubset;
use std::io::{Read, Write};
use thiserror::Error;

/// The identifier column PaDEL-Descriptor writes in front of the descriptor columns.
pub const DEFAULT_NAME_COLUMN: &str = "Name";

#[derive(Debug, Error)]
pub enum DescriptorCsvError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Identifier column '{0}' not found in header")]
    MissingNameColumn(String),

    #[error("Non-numeric value '{value}' in column '{column}' on data row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Malformed descriptor table: {0}")]
    Shape(#[from] MatrixShapeError),
}

/// Reads a descriptor table: one identifier column plus numeric descriptor columns.
///
/// Empty cells and the tokens `NaN`, `Infinity` and `-Infinity` (case-insensitive)
/// are read as non-finite values so the prediction stage can reject them explicitly.
/// Any other non-numeric cell is an error.
pub fn read_descriptor_csv<R: Read>(
    reader: R,
    name_column: &str,
) -> Result<DescriptorMatrix, DescriptorCsvError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let name_idx = headers
        .iter()
        .position(|h| h == name_column)
        .ok_or_else(|| DescriptorCsvError::MissingNameColumn(name_column.to_string()))?;

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != name_idx)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut row_names = Vec::new();
    let mut rows = Vec::new();
    for (row_idx, record) in rdr.records().enumerate() {
        let record = record?;
        let mut values = Vec::with_capacity(columns.len());
        for (col_idx, cell) in record.iter().enumerate() {
            if col_idx == name_idx {
                continue;
            }
            values.push(parse_cell(cell).ok_or_else(|| DescriptorCsvError::InvalidValue {
                row: row_idx + 1,
                column: headers.get(col_idx).unwrap_or_default().to_string(),
                value: cell.to_string(),
            })?);
        }
        row_names.push(record.get(name_idx).unwrap_or_default().to_string());
        rows.push(values);
    }

    Ok(DescriptorMatrix::new(columns, row_names, rows)?)
}

fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() {
        return Some(f64::NAN);
    }
    match cell.to_ascii_lowercase().as_str() {
        "nan" => Some(f64::NAN),
        "infinity" | "inf" => Some(f64::INFINITY),
        "-infinity" | "-inf" => Some(f64::NEG_INFINITY),
        _ => cell.parse::<f64>().ok(),
    }
}

/// Writes a descriptor table back out as CSV with the identifier column first.
pub fn write_descriptor_csv<W: Write>(
    matrix: &DescriptorMatrix,
    name_column: &str,
    writer: W,
) -> Result<(), csv::Error> {
    write_table(
        name_column,
        matrix.columns(),
        matrix.row_names(),
        matrix.rows(),
        writer,
    )
}

pub fn write_subset_csv<W: Write>(
    subset: &FeatureSubset,
    name_column: &str,
    writer: W,
) -> Result<(), csv::Error> {
    write_table(
        name_column,
        &subset.columns,
        &subset.row_names,
        &subset.rows,
        writer,
    )
}

fn write_table<W: Write>(
    name_column: &str,
    columns: &[String],
    row_names: &[String],
    rows: &[Vec<f64>],
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(std::iter::once(name_column).chain(columns.iter().map(String::as_str)))?;
    for (name, values) in row_names.iter().zip(rows) {
        let mut record = Vec::with_capacity(values.len() + 1);
        record.push(name.clone());
        record.extend(values.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_padel_style_output() {
        let csv = "Name,PubchemFP0,PubchemFP1,PubchemFP2\n\
                   ethanol,1,0,0\n\
                   acetic_acid,1,1,0\n";
        let matrix = read_descriptor_csv(csv.as_bytes(), DEFAULT_NAME_COLUMN).unwrap();

        assert_eq!(matrix.shape(), (2, 3));
        assert_eq!(matrix.columns(), &["PubchemFP0", "PubchemFP1", "PubchemFP2"]);
        assert_eq!(matrix.row_names(), &["ethanol", "acetic_acid"]);
        assert_eq!(matrix.value(1, "PubchemFP1"), Some(1.0));
    }

    #[test]
    fn name_column_may_appear_anywhere() {
        let csv = "A,Name,B\n1.5,x,2.5\n";
        let matrix = read_descriptor_csv(csv.as_bytes(), "Name").unwrap();
        assert_eq!(matrix.columns(), &["A", "B"]);
        assert_eq!(matrix.rows(), &[vec![1.5, 2.5]]);
    }

    #[test]
    fn empty_and_nan_cells_become_non_finite() {
        let csv = "Name,A,B,C\nx,,NaN,-Infinity\n";
        let matrix = read_descriptor_csv(csv.as_bytes(), "Name").unwrap();
        let row = &matrix.rows()[0];
        assert!(row[0].is_nan());
        assert!(row[1].is_nan());
        assert_eq!(row[2], f64::NEG_INFINITY);
    }

    #[test]
    fn non_numeric_cell_is_rejected() {
        let csv = "Name,A\nx,abc\n";
        let err = read_descriptor_csv(csv.as_bytes(), "Name").unwrap_err();
        assert!(matches!(
            err,
            DescriptorCsvError::InvalidValue { row: 1, ref column, ref value } if column == "A" && value == "abc"
        ));
    }

    #[test]
    fn missing_name_column_is_rejected() {
        let csv = "Molecule,A\nx,1\n";
        let err = read_descriptor_csv(csv.as_bytes(), "Name").unwrap_err();
        assert!(matches!(err, DescriptorCsvError::MissingNameColumn(_)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let csv = "Name,A,B\nx,1,2\ny,1\n";
        let err = read_descriptor_csv(csv.as_bytes(), "Name").unwrap_err();
        assert!(matches!(err, DescriptorCsvError::Csv(_)));
    }

    #[test]
    fn write_descriptor_csv_puts_names_first() {
        let matrix = DescriptorMatrix::new(
            vec!["A".to_string(), "B".to_string()],
            vec!["x".to_string()],
            vec![vec![1.0, 0.5]],
        )
        .unwrap();
        let mut buf = Vec::new();
        write_descriptor_csv(&matrix, "Name", &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Name,A,B\nx,1,0.5\n");
    }
}
