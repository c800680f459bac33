// Catalog file locations

use std::env;
use std::path::{Path, PathBuf};

pub const HOTELS_FILE: &str = "hotels.json";
pub const CUSTOMERS_FILE: &str = "customers.json";
pub const RESERVATIONS_FILE: &str = "reservations.json";

/// Environment variable naming the directory that holds the three files
pub const DATA_DIR_ENV: &str = "HOTEL_RESERVATIONS_DIR";

/// Where the hotels, customers and reservations files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPaths {
    pub hotels: PathBuf,
    pub customers: PathBuf,
    pub reservations: PathBuf,
}

impl CatalogPaths {
    /// Standard file names under `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        CatalogPaths {
            hotels: dir.join(HOTELS_FILE),
            customers: dir.join(CUSTOMERS_FILE),
            reservations: dir.join(RESERVATIONS_FILE),
        }
    }

    /// `$HOTEL_RESERVATIONS_DIR` if set, otherwise the working directory.
    pub fn from_env() -> Self {
        match env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::in_dir(dir),
            _ => Self::default(),
        }
    }
}

impl Default for CatalogPaths {
    fn default() -> Self {
        CatalogPaths {
            hotels: PathBuf::from(HOTELS_FILE),
            customers: PathBuf::from(CUSTOMERS_FILE),
            reservations: PathBuf::from(RESERVATIONS_FILE),
        }
    }
}
