use phf::phf_map;
use thiserror::Error;

/// PaDEL descriptor-type files shipped in the `padel/` data directory, keyed by the
/// fingerprint name accepted in configuration.
pub static FINGERPRINT_FILES: phf::Map<&'static str, &'static str> = phf_map! {
    "pubchem" => "PubchemFingerprinter.xml",
    "maccs" => "MACCSFingerprinter.xml",
    "substructure" => "SubstructureFingerprinter.xml",
    "klekota-roth" => "KlekotaRothFingerprinter.xml",
    "estate" => "EStateFingerprinter.xml",
    "extended" => "ExtendedFingerprinter.xml",
    "graph-only" => "GraphOnlyFingerprinter.xml",
    "standard" => "Fingerprinter.xml",
    "atom-pairs-2d" => "AtomPairs2DFingerprinter.xml",
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown fingerprint '{0}'. Expected one of: {known}.", known = known_fingerprints())]
    UnknownFingerprint(String),

    #[error("Invalid PaDEL jar name '{0}'. Only 'default' is recognized.")]
    InvalidPadelJarName(String),

    #[error(
        "Invalid target name '{0}'. Use letters, digits, '-', '_' or '.', not starting with '.'."
    )]
    InvalidTargetName(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Model,
    Schema,
    PadelJar,
    Fingerprint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLogicalName {
    TargetModel { target: String },
    TargetSchema { target: String },
    PadelJar,
    Fingerprint { file_name: &'static str },
}

pub fn parse_logical_name(name: &str, kind: NameKind) -> Result<ParsedLogicalName, ParseError> {
    match kind {
        NameKind::Model => Ok(ParsedLogicalName::TargetModel {
            target: parse_target_name(name)?,
        }),
        NameKind::Schema => Ok(ParsedLogicalName::TargetSchema {
            target: parse_target_name(name)?,
        }),
        NameKind::PadelJar => {
            if name == "default" {
                Ok(ParsedLogicalName::PadelJar)
            } else {
                Err(ParseError::InvalidPadelJarName(name.to_string()))
            }
        }
        NameKind::Fingerprint => FINGERPRINT_FILES
            .get(name.to_ascii_lowercase().as_str())
            .map(|&file_name| ParsedLogicalName::Fingerprint { file_name })
            .ok_or_else(|| ParseError::UnknownFingerprint(name.to_string())),
    }
}

pub fn parse_target_name(name: &str) -> Result<String, ParseError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(name.to_string())
    } else {
        Err(ParseError::InvalidTargetName(name.to_string()))
    }
}

fn known_fingerprints() -> String {
    let mut names: Vec<&str> = FINGERPRINT_FILES.keys().copied().collect();
    names.sort_unstable();
    names.join(", ")
}
