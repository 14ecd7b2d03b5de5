use bioact::core::io::export::{DEFAULT_FILE_NAME, DEFAULT_NAME_COLUMN, DEFAULT_SCORE_COLUMN};
use bioact::engine::config::{DEFAULT_HEAP, DEFAULT_PROGRAM};

pub struct DefaultsConfig {
    pub program: String,
    pub padel_jar: String,
    pub fingerprint: String,
    pub heap: String,
    pub remove_salt: bool,
    pub standardize_nitro: bool,
    pub fingerprints: bool,
    pub timeout_secs: u64,
    pub keep_intermediates: bool,
    pub file_name: String,
    pub name_column: String,
    pub score_column: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            padel_jar: "default".to_string(),
            fingerprint: "pubchem".to_string(),
            heap: DEFAULT_HEAP.to_string(),
            remove_salt: true,
            standardize_nitro: true,
            fingerprints: true,
            timeout_secs: 1800,
            keep_intermediates: false,
            file_name: DEFAULT_FILE_NAME.to_string(),
            name_column: DEFAULT_NAME_COLUMN.to_string(),
            score_column: DEFAULT_SCORE_COLUMN.to_string(),
        }
    }
}
