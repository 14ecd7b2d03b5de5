//! Parser for the user-supplied molecule list.
//!
//! The format has no header and one molecule per line: a SMILES string and an
//! identifier separated by whitespace, for example
//!
//! ```text
//! CC(=O)Oc1ccccc1C(=O)O CHEMBL25
//! CN1C=NC2=C1C(=O)N(C(=O)N2C)C CHEMBL113
//! ```
//!
//! Every line must split into exactly two fields, blank lines included; rows are never
//! dropped or merged. A single trailing newline does not start a new line.

use crate::core::models::molecule::{MoleculeBatch, MoleculeRecord};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("The input contains no molecules")]
    Empty,

    #[error(
        "Malformed row on line {line}: expected a SMILES string and a molecule name separated by whitespace, found {fields} field(s) in '{content}'"
    )]
    MalformedRow {
        line: usize,
        fields: usize,
        content: String,
    },
}

/// Parses raw input text into an ordered [`MoleculeBatch`].
///
/// # Errors
///
/// Returns [`ParseError::Empty`] if the text holds nothing but whitespace, and
/// [`ParseError::MalformedRow`] for the first line that does not hold exactly two
/// fields (line numbers are 1-based). A blank line between records is malformed.
pub fn parse(raw_text: &str) -> Result<MoleculeBatch, ParseError> {
    if raw_text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut records = Vec::new();
    for (idx, line) in raw_text.lines().enumerate() {
        let trimmed = line.trim();
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        match fields.as_slice() {
            [structure, name] => records.push(MoleculeRecord::new(*structure, *name)),
            _ => {
                return Err(ParseError::MalformedRow {
                    line: idx + 1,
                    fields: fields.len(),
                    content: trimmed.to_string(),
                });
            }
        }
    }

    Ok(MoleculeBatch::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_field_lines_in_order() {
        let batch = parse("CCO ethanol\nCC(=O)O acetic_acid").unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch.records(),
            &[
                MoleculeRecord::new("CCO", "ethanol"),
                MoleculeRecord::new("CC(=O)O", "acetic_acid"),
            ]
        );
    }

    #[test]
    fn batch_length_matches_line_count() {
        let lines: Vec<String> = (0..50).map(|i| format!("C{} mol_{}", "C".repeat(i), i)).collect();
        let batch = parse(&lines.join("\n")).unwrap();
        assert_eq!(batch.len(), 50);
        for (i, record) in batch.iter().enumerate() {
            assert_eq!(record.name, format!("mol_{}", i));
        }
    }

    #[test]
    fn accepts_crlf_and_tab_separators_and_one_trailing_newline() {
        let batch = parse("CCO\tethanol\r\nc1ccccc1 benzene\r\n").unwrap();
        assert_eq!(batch.names().collect::<Vec<_>>(), vec!["ethanol", "benzene"]);
    }

    #[test]
    fn blank_line_between_records_is_malformed() {
        assert_eq!(
            parse("CCO ethanol\n\nCC(=O)O acetic_acid"),
            Err(ParseError::MalformedRow {
                line: 2,
                fields: 0,
                content: String::new()
            })
        );
        assert!(matches!(
            parse("CCO ethanol\n   \nC methane"),
            Err(ParseError::MalformedRow { line: 2, fields: 0, .. })
        ));
    }

    #[test]
    fn trailing_blank_line_is_malformed() {
        assert!(matches!(
            parse("CCO ethanol\n\n"),
            Err(ParseError::MalformedRow { line: 2, fields: 0, .. })
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("\n\n   \n"), Err(ParseError::Empty));
    }

    #[test]
    fn single_field_row_is_malformed() {
        assert_eq!(
            parse("CCO"),
            Err(ParseError::MalformedRow {
                line: 1,
                fields: 1,
                content: "CCO".to_string()
            })
        );
    }

    #[test]
    fn extra_field_is_malformed_and_reports_its_line() {
        let result = parse("CCO ethanol\nCC(=O)O acetic acid\nC methane");
        assert_eq!(
            result,
            Err(ParseError::MalformedRow {
                line: 2,
                fields: 3,
                content: "CC(=O)O acetic acid".to_string()
            })
        );
    }
}
