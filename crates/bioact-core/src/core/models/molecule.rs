/// A single molecule as supplied by the user: a SMILES string and an identifier.
///
/// Records are created by the input parser and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoleculeRecord {
    /// The structural notation (SMILES) of the molecule.
    pub structure: String,
    /// The identifier of the molecule, typically a ChEMBL ID.
    pub name: String,
}

impl MoleculeRecord {
    pub fn new(structure: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            structure: structure.into(),
            name: name.into(),
        }
    }
}

/// An ordered collection of molecules processed together in one pipeline run.
///
/// The order is significant: every downstream value (descriptor rows, feature rows,
/// predictions) is aligned positionally with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoleculeBatch {
    records: Vec<MoleculeRecord>,
}

impl MoleculeBatch {
    pub fn new(records: Vec<MoleculeRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MoleculeRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MoleculeRecord> {
        self.records.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }
}

impl FromIterator<MoleculeRecord> for MoleculeBatch {
    fn from_iter<I: IntoIterator<Item = MoleculeRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MoleculeBatch {
    type Item = &'a MoleculeRecord;
    type IntoIter = std::slice::Iter<'a, MoleculeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
