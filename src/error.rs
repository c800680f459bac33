// Error types for the reservations catalog
//
// Validation errors are local (skip the record, keep going), store errors are
// fatal at load time, and "not found" is never an error.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or modifying a hotel's room ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotelError {
    /// Room collection is not a list of distinct integers
    #[error("Rooms must be a list of integers: {reason}")]
    InvalidRoomList { reason: String },

    /// Name or location is empty
    #[error("hotel {field} must not be empty")]
    EmptyField { field: &'static str },
}

impl HotelError {
    pub fn invalid_rooms(reason: impl Into<String>) -> Self {
        HotelError::InvalidRoomList {
            reason: reason.into(),
        }
    }
}

/// Errors from the registries themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("'{0}' is not registered")]
    NotFound(String),

    /// Renaming would overwrite a different entry
    #[error("'{0}' is already registered")]
    NameTaken(String),
}

/// Errors surfaced by the `Reservations` facade and the flattening projector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("cannot rename to '{0}': name already in use")]
    NameTaken(String),

    /// A live reservation names a customer missing from the registry
    #[error("room {room} of hotel '{hotel}' is reserved to unknown customer '{customer}'")]
    DanglingReservation {
        hotel: String,
        room: i64,
        customer: String,
    },

    #[error(transparent)]
    InvalidRooms(#[from] HotelError),
}

/// Errors reading or writing the JSON record files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid format in catalogue json file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("File {path} is not encoded in UTF-8. Verify and retry")]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("{path} must contain a JSON array of records")]
    NotACollection { path: PathBuf },

    #[error("failed to encode records for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
