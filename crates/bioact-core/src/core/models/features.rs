use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// The ordered set of descriptor columns a deployed model was trained on.
///
/// The schema is fixed for a given model. It is usually loaded from the header row of a
/// CSV file exported alongside the model (the data rows, if any, are ignored).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

/// The descriptor matrix restricted and reordered to exactly the columns of a
/// [`FeatureSchema`], with rows in batch order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSubset {
    pub columns: Vec<String>,
    pub row_names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Required descriptor column '{0}' is missing from the computed descriptors")]
    MissingColumn(String),

    #[error("Feature schema lists column '{0}' more than once")]
    DuplicateColumn(String),

    #[error("Feature schema is empty")]
    Empty,

    #[error("Feature schema column {position} has no name")]
    BlankColumn { position: usize },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.iter().all(|name| name.trim().is_empty()) {
            return Err(SchemaError::Empty);
        }
        if let Some(idx) = columns.iter().position(|name| name.trim().is_empty()) {
            return Err(SchemaError::BlankColumn { position: idx + 1 });
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self { columns })
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, SchemaError> {
        let file = std::fs::File::open(path).map_err(|e| SchemaError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_csv_reader(file).map_err(|e| match e {
            SchemaError::Csv { source, .. } => SchemaError::Csv {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_csv_reader(reader: impl Read) -> Result<Self, SchemaError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = csv_reader.headers().map_err(|e| SchemaError::Csv {
            path: "<reader>".to_string(),
            source: e,
        })?;
        let columns = headers.iter().map(|h| h.trim().to_string()).collect();
        Self::new(columns)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FeatureSubset {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_columns())
    }
}
