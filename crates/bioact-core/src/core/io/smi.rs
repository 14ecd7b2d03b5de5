use crate::core::models::molecule::MoleculeBatch;
use std::io::Write;
use std::path::Path;

/// Writes a batch in the SMILES-file layout the descriptor tool consumes:
/// `structure<TAB>name`, one molecule per line, no header, batch order.
pub fn write_smi<W: Write>(batch: &MoleculeBatch, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);
    for record in batch {
        wtr.write_record([record.structure.as_str(), record.name.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_smi_to_path(batch: &MoleculeBatch, path: &Path) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_smi(batch, std::io::BufWriter::new(file))
}
