// 💾 Record Store - JSON arrays on disk
//
// read:  path → list of loose records (missing file = nothing to read)
// write: list of records → pretty JSON, 4-space indent

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

use crate::config::CatalogPaths;
use crate::error::StoreError;
use crate::records::{Collections, RawCollections};

/// Read a JSON array of records. Returns `Ok(None)` if the file does not exist.
pub fn read_records(path: &Path) -> Result<Option<Vec<Value>>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "file not found, skipping");
            return Ok(None);
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let text = std::str::from_utf8(&bytes).map_err(|source| StoreError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(text).map_err(|source| StoreError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Array(records) => Ok(Some(records)),
        _ => Err(StoreError::NotACollection {
            path: path.to_path_buf(),
        }),
    }
}

/// Write records as a pretty-printed JSON array (4-space indent).
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    records
        .serialize(&mut serializer)
        .map_err(|source| StoreError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    buf.push(b'\n');

    fs::write(path, buf).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read all three files. Missing files count as empty collections.
pub fn load_collections(paths: &CatalogPaths) -> Result<RawCollections, StoreError> {
    let collections = RawCollections {
        hotels: read_records(&paths.hotels)?.unwrap_or_default(),
        customers: read_records(&paths.customers)?.unwrap_or_default(),
        reservations: read_records(&paths.reservations)?.unwrap_or_default(),
    };

    debug!(
        hotels = collections.hotels.len(),
        customers = collections.customers.len(),
        reservations = collections.reservations.len(),
        "catalog files read"
    );
    Ok(collections)
}

/// Write the three files one after another.
///
/// There is no cross-file atomicity: a failure part-way leaves the files
/// out of sync with each other.
pub fn save_collections(paths: &CatalogPaths, collections: &Collections) -> Result<(), StoreError> {
    write_records(&paths.hotels, &collections.hotels)?;
    write_records(&paths.reservations, &collections.reservations)?;
    write_records(&paths.customers, &collections.customers)?;

    info!(
        hotels = collections.hotels.len(),
        customers = collections.customers.len(),
        reservations = collections.reservations.len(),
        "catalog saved"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CustomerRecord, HotelRecord};
    use serde_json::json;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_records(&dir.path().join("nope.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hotels.json");
        let hotels = vec![HotelRecord {
            name: "Hard Rock".to_string(),
            location: "Cancun".to_string(),
            rooms: vec![101, 102],
        }];

        write_records(&path, &hotels).unwrap();
        let records = read_records(&path).unwrap().unwrap();

        assert_eq!(records, vec![json!({"name": "Hard Rock", "location": "Cancun", "rooms": [101, 102]})]);
    }

    #[test]
    fn test_write_uses_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");
        let customers = vec![CustomerRecord {
            name: "Jimmy Page".to_string(),
            email: "JP@LedZep.com".to_string(),
        }];

        write_records(&path, &customers).unwrap();
        let text = fs::read_to_string(&path).unwrap();

        assert!(text.starts_with("[\n    {\n        \"name\": \"Jimmy Page\""));
        assert!(text.ends_with("]\n"));
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hotels.json");
        fs::write(&path, "[{\"name\": ").unwrap();

        assert!(matches!(read_records(&path), Err(StoreError::Decode { .. })));
    }

    #[test]
    fn test_non_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hotels.json");
        fs::write(&path, [b'[', 0xff, 0xfe, b']']).unwrap();

        assert!(matches!(read_records(&path), Err(StoreError::Encoding { .. })));
    }

    #[test]
    fn test_top_level_object_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hotels.json");
        fs::write(&path, "{\"name\": \"Hard Rock\"}").unwrap();

        assert!(matches!(read_records(&path), Err(StoreError::NotACollection { .. })));
    }

    #[test]
    fn test_load_collections_with_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = CatalogPaths::in_dir(dir.path());
        fs::write(&paths.customers, "[{\"name\": \"Jimmy Page\", \"email\": \"JP@LedZep.com\"}]").unwrap();

        let raw = load_collections(&paths).unwrap();

        assert!(raw.hotels.is_empty());
        assert!(raw.reservations.is_empty());
        assert_eq!(raw.customers.len(), 1);
    }
}
