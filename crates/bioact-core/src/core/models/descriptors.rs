use std::collections::HashMap;
use thiserror::Error;

/// The full descriptor table computed for a batch by the external descriptor tool.
///
/// Rows follow the order of the originating [`MoleculeBatch`](super::molecule::MoleculeBatch)
/// and each row carries the identifier reported by the tool. Cells the tool left empty
/// or reported as `NaN`/`Infinity` are stored as non-finite values; the matrix never
/// substitutes defaults for them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorMatrix {
    columns: Vec<String>,
    column_index: HashMap<String, usize>,
    row_names: Vec<String>,
    rows: Vec<Vec<f64>>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatrixShapeError {
    #[error("Duplicate descriptor column '{0}'")]
    DuplicateColumn(String),
    #[error("Row {row} has {found} values but the header declares {expected} descriptors")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{names} row identifiers supplied for {rows} rows")]
    NameCount { names: usize, rows: usize },
}

impl DescriptorMatrix {
    pub fn new(
        columns: Vec<String>,
        row_names: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, MatrixShapeError> {
        let mut column_index = HashMap::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            if column_index.insert(name.clone(), idx).is_some() {
                return Err(MatrixShapeError::DuplicateColumn(name.clone()));
            }
        }
        if row_names.len() != rows.len() {
            return Err(MatrixShapeError::NameCount {
                names: row_names.len(),
                rows: rows.len(),
            });
        }
        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != columns.len())
        {
            return Err(MatrixShapeError::RowWidth {
                row,
                expected: columns.len(),
                found: values.len(),
            });
        }

        Ok(Self {
            columns,
            column_index,
            row_names,
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index.contains_key(name)
    }

    pub fn row_names(&self) -> &[String] {
        &self.row_names
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`, in the order a dataframe reports its shape.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_columns())
    }

    pub fn value(&self, row: usize, column: &str) -> Option<f64> {
        let col = self.column_position(column)?;
        self.rows.get(row).map(|values| values[col])
    }

    /// Returns a copy of the matrix with its rows rearranged so that the row at
    /// position `i` is the row previously at `order[i]`.
    ///
    /// `order` must be a permutation of `0..n_rows()`; this is checked by the caller.
    pub(crate) fn reordered(&self, order: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            column_index: self.column_index.clone(),
            row_names: order.iter().map(|&i| self.row_names[i].clone()).collect(),
            rows: order.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}
