// Hotel Reservations - Core Library
// In-memory catalog of hotels, customers and reservations persisted as three JSON files

pub mod config;
pub mod entities;
pub mod error;
pub mod reconciliation;
pub mod records;
pub mod reservations;
pub mod store;

// Re-export commonly used types
pub use config::CatalogPaths;
pub use entities::{
    parse_room_list, Customer, CustomerRegistry, CustomerUpdate, Hotel, HotelRegistry,
    HotelUpdate, RoomNumber,
};
pub use error::{CatalogError, HotelError, RegistryError, StoreError};
pub use reconciliation::{LoadReport, ReconciliationEngine, SkipReason, SkippedRecord};
pub use records::{
    CollectionKind, Collections, CustomerRecord, HotelRecord, RawCollections, ReservationRecord,
};
pub use reservations::{DanglingReservation, Reservations};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
