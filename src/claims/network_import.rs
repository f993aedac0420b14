use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::hospital::NetworkDirectory;

/// Error raised while importing a network-hospital directory export.
#[derive(Debug, thiserror::Error)]
pub enum NetworkImportError {
    #[error("failed to open network directory file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse network directory csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("network directory export contained no hospitals")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct NetworkRow {
    #[serde(rename = "Hospital Name")]
    hospital_name: String,
}

/// Hydrate a [`NetworkDirectory`] from an insurer CSV export with a
/// `Hospital Name` column. Blank rows are skipped; an export with no usable
/// names is rejected so a truncated file cannot silently empty the network.
pub fn directory_from_path<P: AsRef<Path>>(path: P) -> Result<NetworkDirectory, NetworkImportError> {
    let file = File::open(path)?;
    directory_from_reader(file)
}

pub fn directory_from_reader<R: Read>(reader: R) -> Result<NetworkDirectory, NetworkImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut names = Vec::new();
    for record in csv_reader.deserialize::<NetworkRow>() {
        let row = record?;
        if !row.hospital_name.trim().is_empty() {
            names.push(row.hospital_name);
        }
    }

    let directory = NetworkDirectory::from_names(names.iter().map(String::as_str));
    if directory.is_empty() {
        return Err(NetworkImportError::Empty);
    }
    Ok(directory)
}
