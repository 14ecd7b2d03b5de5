use crate::core::models::prediction::PredictionResult;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

pub const DEFAULT_FILE_NAME: &str = "prediction.csv";
pub const DEFAULT_NAME_COLUMN: &str = "molecule_name";
pub const DEFAULT_SCORE_COLUMN: &str = "pIC50";

/// Column names and the suggested file name of the exported table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub file_name: String,
    pub name_column: String,
    pub score_column: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            name_column: DEFAULT_NAME_COLUMN.to_string(),
            score_column: DEFAULT_SCORE_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to serialize predictions as CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialized predictions are not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A downloadable, binary-safe rendition of a [`PredictionResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub file_name: String,
    pub mime_type: &'static str,
    pub csv: String,
    pub base64: String,
}

impl EncodedPayload {
    /// A `data:` URI embedding the CSV, suitable for an anchor `href`.
    pub fn data_uri(&self) -> String {
        format!("data:file/csv;base64,{}", self.base64)
    }

    pub fn html_link(&self) -> String {
        format!(
            r#"<a href="{}" download="{}">Download Predictions</a>"#,
            self.data_uri(),
            self.file_name
        )
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.csv.as_bytes()
    }
}

/// Serializes predictions to CSV (`name,score` with a header) and base64-encodes them.
///
/// Rows appear in the order of the result. Nothing is written to disk.
pub fn export(result: &PredictionResult, config: &ExportConfig) -> Result<EncodedPayload, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([config.name_column.as_str(), config.score_column.as_str()])?;
    for prediction in result {
        wtr.write_record([prediction.name.clone(), prediction.score.to_string()])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))?;

    let base64 = STANDARD.encode(&bytes);
    Ok(EncodedPayload {
        file_name: config.file_name.clone(),
        mime_type: "text/csv",
        csv: String::from_utf8(bytes)?,
        base64,
    })
}
