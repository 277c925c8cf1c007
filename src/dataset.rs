//! Postal code dataset loader
//!
//! Reads the bpost postal code list (semicolon separated, ISO-8859-1, one
//! header row) into an [`AliasTable`]. Columns used:
//!
//! 0. postal code
//! 1. locality (sub-municipality) name
//! 2. main municipality name
//!
//! Anything after the third column is ignored.

use crate::normalize::AliasTable;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Load the alias table from a dataset file.
pub fn load_aliases(path: &Path) -> Result<AliasTable> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open postal code dataset: {}", path.display()))?;
    let table = read_aliases(file);
    tracing::info!(
        path = %path.display(),
        entries = table.len(),
        "Loaded municipality aliases"
    );
    Ok(table)
}

/// Build an alias table from dataset content. Malformed rows are skipped.
pub fn read_aliases<R: Read>(input: R) -> AliasTable {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let mut table = AliasTable::new();
    let mut skipped = 0usize;

    for record in reader.byte_records() {
        let Ok(record) = record else {
            skipped += 1;
            continue;
        };

        let fields: Vec<String> = record.iter().take(3).map(latin1).collect();
        let [code, locality, municipality] = fields.as_slice() else {
            skipped += 1;
            continue;
        };

        let (locality, municipality) = (locality.trim(), municipality.trim());
        let Ok(code) = code.trim().parse::<u32>() else {
            skipped += 1;
            continue;
        };
        if locality.is_empty() || municipality.is_empty() {
            skipped += 1;
            continue;
        }

        table.insert(code, locality, municipality);
        table.insert(code, municipality, municipality);
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Skipped malformed postal code rows");
    }
    table
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    const HEADER: &[u8] = b"Postcode;Plaatsnaam;Hoofdgemeente;Provincie\n";

    #[test]
    fn test_reads_aliases_and_skips_header() {
        let data = b"Postcode;Plaatsnaam;Hoofdgemeente;Provincie\n\
            1200;Sint-Lambrechts-Woluwe;Woluwe-Saint-Lambert;Brussel\n\
            4000;Glain;Li\xe8ge;Luik\n";

        let table = read_aliases(&data[..]);
        assert_eq!(
            table.resolve(&json!("1200"), "Sint-Lambrechts-Woluwe"),
            Some("Woluwe-Saint-Lambert")
        );
        assert_eq!(table.resolve(&json!("4000"), "glain"), Some("Liège"));
        assert_eq!(table.resolve(&json!("4000"), "Liege"), Some("Liège"));
        assert_eq!(table.resolve(&json!("0"), "Plaatsnaam"), None);
    }

    #[test]
    fn test_skips_malformed_rows() {
        let data = b"Postcode;Plaatsnaam;Hoofdgemeente;Provincie\n\
            abcd;Nowhere;Nothing;X\n\
            1000;Brussel\n\
            2000;;Antwerpen;Antwerpen\n\
            \n\
            9000;Gent;Gent;Oost-Vlaanderen\n";

        let table = read_aliases(&data[..]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.resolve(&json!(9000), "GENT"), Some("Gent"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(HEADER).unwrap();
        file.write_all(b"7170;Bois-d'Haine;Manage;Henegouwen\n").unwrap();
        file.flush().unwrap();

        let table = load_aliases(file.path()).unwrap();
        assert_eq!(table.resolve(&json!("7170"), "Bois d'Haine"), Some("Manage"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_aliases(&dir.path().join("absent.csv")).unwrap_err();
        assert!(err.to_string().contains("postal code dataset"));
    }
}
