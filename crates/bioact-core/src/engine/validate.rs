use super::error::ValidationError;
use crate::core::models::molecule::{MoleculeBatch, MoleculeRecord};

/// Confirms that a batch satisfies the shape the downstream stages rely on.
///
/// The parser already guarantees these properties for text input; this check reports
/// violations for batches built any other way through a single error channel. A field
/// containing whitespace would split into extra columns in the tab-delimited file the
/// descriptor tool reads, so it is rejected here.
pub fn validate(batch: &MoleculeBatch) -> Result<(), ValidationError> {
    if batch.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }
    for (index, record) in batch.iter().enumerate() {
        check_record(record).map_err(|reason| ValidationError::MalformedRecord { index, reason })?;
    }
    Ok(())
}

fn check_record(record: &MoleculeRecord) -> Result<(), String> {
    for (label, value) in [("structure", &record.structure), ("name", &record.name)] {
        if value.is_empty() {
            return Err(format!("{} field is empty", label));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(format!(
                "{} field '{}' contains whitespace, so the record does not have exactly two fields",
                label, value
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_batch_passes() {
        let batch = MoleculeBatch::new(vec![
            MoleculeRecord::new("CCO", "ethanol"),
            MoleculeRecord::new("CC(=O)O", "acetic_acid"),
        ]);
        assert_eq!(validate(&batch), Ok(()));
    }

    #[test]
    fn empty_batch_fails() {
        assert_eq!(
            validate(&MoleculeBatch::default()),
            Err(ValidationError::EmptyBatch)
        );
    }

    #[test]
    fn empty_field_identifies_the_record() {
        let batch = MoleculeBatch::new(vec![
            MoleculeRecord::new("CCO", "ethanol"),
            MoleculeRecord::new("", "ghost"),
        ]);
        assert!(matches!(
            validate(&batch),
            Err(ValidationError::MalformedRecord { index: 1, reason }) if reason.contains("structure")
        ));
    }

    #[test]
    fn embedded_tab_is_rejected() {
        let batch = MoleculeBatch::new(vec![MoleculeRecord::new("CCO", "ethyl\talcohol")]);
        assert!(matches!(
            validate(&batch),
            Err(ValidationError::MalformedRecord { index: 0, .. })
        ));
    }
}
