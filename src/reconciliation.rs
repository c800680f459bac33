// ⚖️ Reconciliation Engine - Rebuild the catalog from three flat files
//
// The hotels, customers and reservations files are denormalized and edited
// by hand, so they disagree. The passes always run in this order:
//
//   1. hotels        (first occurrence of a name wins)
//   2. customers     (last occurrence of a name wins)
//   3. reservations  (may create hotels, rooms and customers on the fly)
//
// Bad records are skipped, never fatal. Everything skipped or repaired ends
// up in the LoadReport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::entities::{parse_room_list, Customer, Hotel, RoomNumber};
use crate::records::{has_fields, CollectionKind, RawCollections};
use crate::reservations::Reservations;

const HOTEL_FIELDS: [&str; 3] = ["name", "location", "rooms"];
const CUSTOMER_FIELDS: [&str; 2] = ["name", "email"];
const RESERVATION_FIELDS: [&str; 5] = ["customer", "email", "hotel", "room", "location"];

// ============================================================================
// LOAD REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Record is not a JSON object
    NotAnObject,

    /// A required field is missing, null, or empty
    MissingFields,

    /// A field has the wrong JSON type
    WrongType { field: String },

    /// Room list rejected by the hotel ledger
    InvalidRooms { reason: String },

    /// A hotel with this name was already loaded
    DuplicateHotel { name: String },
}

impl SkipReason {
    pub fn describe(&self) -> String {
        match self {
            SkipReason::NotAnObject => "not a JSON object".to_string(),
            SkipReason::MissingFields => "missing or empty required fields".to_string(),
            SkipReason::WrongType { field } => format!("field '{}' has the wrong type", field),
            SkipReason::InvalidRooms { reason } => format!("invalid rooms: {}", reason),
            SkipReason::DuplicateHotel { name } => format!("hotel '{}' already loaded", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub collection: CollectionKind,
    /// Position of the record in its file
    pub index: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    pub hotels_loaded: usize,
    pub customers_loaded: usize,
    pub reservations_applied: usize,

    /// Customers created because only a reservation mentioned them
    pub stub_customers: usize,
    /// Hotels created because only a reservation mentioned them
    pub hotels_created: usize,
    /// Rooms added to existing hotels because a reservation used them
    pub rooms_added: usize,
    /// Rooms that were reserved twice; the later record won
    pub overwritten: usize,

    pub skipped: Vec<SkippedRecord>,
    pub reconciled_at: DateTime<Utc>,
}

impl LoadReport {
    fn new() -> Self {
        LoadReport {
            hotels_loaded: 0,
            customers_loaded: 0,
            reservations_applied: 0,
            stub_customers: 0,
            hotels_created: 0,
            rooms_added: 0,
            overwritten: 0,
            skipped: Vec::new(),
            reconciled_at: Utc::now(),
        }
    }

    /// No record was skipped and nothing had to be repaired
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
            && self.stub_customers == 0
            && self.hotels_created == 0
            && self.rooms_added == 0
            && self.overwritten == 0
    }

    pub fn skipped_in(&self, collection: CollectionKind) -> usize {
        self.skipped
            .iter()
            .filter(|s| s.collection == collection)
            .count()
    }

    pub fn summary(&self) -> String {
        format!(
            "Loaded {} hotels, {} customers, {} reservations ({} skipped, {} stub customers, {} hotels created, {} rooms added, {} overwritten)",
            self.hotels_loaded,
            self.customers_loaded,
            self.reservations_applied,
            self.skipped.len(),
            self.stub_customers,
            self.hotels_created,
            self.rooms_added,
            self.overwritten
        )
    }

    fn skip(&mut self, collection: CollectionKind, index: usize, reason: SkipReason) {
        warn!(
            collection = collection.as_str(),
            index,
            reason = %reason.describe(),
            "skipping record"
        );
        self.skipped.push(SkippedRecord {
            collection,
            index,
            reason,
        });
    }
}

// ============================================================================
// RECONCILIATION ENGINE
// ============================================================================

/// One reservation line, after type checks
struct ReservationLine<'a> {
    customer: &'a str,
    email: &'a str,
    hotel: &'a str,
    location: &'a str,
    room: RoomNumber,
}

#[derive(Debug, Default)]
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    pub fn new() -> Self {
        ReconciliationEngine
    }

    /// Merge the three collections into one catalog.
    pub fn reconcile(&self, raw: &RawCollections) -> (Reservations, LoadReport) {
        let mut catalog = Reservations::new();
        let mut report = LoadReport::new();

        self.load_hotels(&mut catalog, &raw.hotels, &mut report);
        self.load_customers(&mut catalog, &raw.customers, &mut report);
        self.apply_reservations(&mut catalog, &raw.reservations, &mut report);

        info!("{}", report.summary());
        (catalog, report)
    }

    fn load_hotels(&self, catalog: &mut Reservations, records: &[Value], report: &mut LoadReport) {
        for (index, record) in records.iter().enumerate() {
            if let Err(reason) = check_record(record, &HOTEL_FIELDS) {
                report.skip(CollectionKind::Hotels, index, reason);
                continue;
            }
            let (name, location) = match (str_field(record, "name"), str_field(record, "location")) {
                (Ok(name), Ok(location)) => (name, location),
                (Err(reason), _) | (_, Err(reason)) => {
                    report.skip(CollectionKind::Hotels, index, reason);
                    continue;
                }
            };

            let hotel = match parse_room_list(&record["rooms"])
                .and_then(|rooms| Hotel::new(name, location, rooms))
            {
                Ok(hotel) => hotel,
                Err(err) => {
                    report.skip(
                        CollectionKind::Hotels,
                        index,
                        SkipReason::InvalidRooms {
                            reason: err.to_string(),
                        },
                    );
                    continue;
                }
            };

            if catalog.hotels.register(hotel) {
                report.hotels_loaded += 1;
            } else {
                report.skip(
                    CollectionKind::Hotels,
                    index,
                    SkipReason::DuplicateHotel {
                        name: name.to_string(),
                    },
                );
            }
        }
    }

    fn load_customers(&self, catalog: &mut Reservations, records: &[Value], report: &mut LoadReport) {
        for (index, record) in records.iter().enumerate() {
            if let Err(reason) = check_record(record, &CUSTOMER_FIELDS) {
                report.skip(CollectionKind::Customers, index, reason);
                continue;
            }
            match (str_field(record, "name"), str_field(record, "email")) {
                (Ok(name), Ok(email)) => {
                    // Last occurrence wins, unlike hotels
                    if catalog.customers.upsert(Customer::new(name, email)).is_some() {
                        debug!(customer = name, "customer listed again, later record kept");
                    } else {
                        report.customers_loaded += 1;
                    }
                }
                (Err(reason), _) | (_, Err(reason)) => {
                    report.skip(CollectionKind::Customers, index, reason);
                }
            }
        }
    }

    fn apply_reservations(
        &self,
        catalog: &mut Reservations,
        records: &[Value],
        report: &mut LoadReport,
    ) {
        for (index, record) in records.iter().enumerate() {
            let line = match reservation_line(record) {
                Ok(line) => line,
                Err(reason) => {
                    report.skip(CollectionKind::Reservations, index, reason);
                    continue;
                }
            };

            if !catalog.customers.contains(line.customer) {
                catalog
                    .customers
                    .register(Customer::new(line.customer, line.email));
                report.stub_customers += 1;
                debug!(customer = line.customer, "stub customer created from reservation");
            }

            match catalog.hotels.get_mut(line.hotel) {
                Some(hotel) => {
                    if !hotel.has_room(line.room) {
                        report.rooms_added += 1;
                        debug!(hotel = line.hotel, room = line.room, "room added from reservation");
                    }
                    if let Some(previous) = hotel.assign_room(line.customer, line.room) {
                        if previous != line.customer {
                            report.overwritten += 1;
                            warn!(
                                hotel = line.hotel,
                                room = line.room,
                                previous = %previous,
                                customer = line.customer,
                                "room reserved twice, keeping the later reservation"
                            );
                        }
                    }
                }
                None => {
                    let mut hotel = match Hotel::new(line.hotel, line.location, vec![line.room]) {
                        Ok(hotel) => hotel,
                        Err(err) => {
                            report.skip(
                                CollectionKind::Reservations,
                                index,
                                SkipReason::InvalidRooms {
                                    reason: err.to_string(),
                                },
                            );
                            continue;
                        }
                    };
                    hotel.reserve_room(line.customer, line.room);
                    catalog.hotels.register(hotel);
                    report.hotels_created += 1;
                    debug!(hotel = line.hotel, "hotel created from reservation");
                }
            }

            report.reservations_applied += 1;
        }
    }
}

// ============================================================================
// RECORD HELPERS
// ============================================================================

fn check_record(record: &Value, fields: &[&str]) -> Result<(), SkipReason> {
    if !record.is_object() {
        return Err(SkipReason::NotAnObject);
    }
    if !has_fields(record, fields) {
        return Err(SkipReason::MissingFields);
    }
    Ok(())
}

fn str_field<'a>(record: &'a Value, field: &str) -> Result<&'a str, SkipReason> {
    record
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| SkipReason::WrongType {
            field: field.to_string(),
        })
}

fn reservation_line(record: &Value) -> Result<ReservationLine<'_>, SkipReason> {
    check_record(record, &RESERVATION_FIELDS)?;

    let room = record
        .get("room")
        .and_then(Value::as_i64)
        .ok_or_else(|| SkipReason::WrongType {
            field: "room".to_string(),
        })?;

    Ok(ReservationLine {
        customer: str_field(record, "customer")?,
        email: str_field(record, "email")?,
        hotel: str_field(record, "hotel")?,
        location: str_field(record, "location")?,
        room,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(hotels: Value, customers: Value, reservations: Value) -> RawCollections {
        fn items(v: Value) -> Vec<Value> {
            v.as_array().cloned().unwrap_or_default()
        }
        RawCollections {
            hotels: items(hotels),
            customers: items(customers),
            reservations: items(reservations),
        }
    }

    #[test]
    fn test_single_reservation_builds_hotel_and_customer() {
        let input = raw(
            json!([]),
            json!([]),
            json!([{"hotel": "H", "room": 101, "customer": "C", "email": "e", "location": "L"}]),
        );

        let (catalog, report) = ReconciliationEngine::new().reconcile(&input);

        let hotel = catalog.hotel("H").unwrap();
        assert_eq!(hotel.location(), "L");
        assert_eq!(hotel.reserved_to(101), Some("C"));
        assert!(hotel.available_rooms().is_empty());
        assert_eq!(catalog.customer("C").unwrap().email(), "e");

        assert_eq!(report.hotels_created, 1);
        assert_eq!(report.stub_customers, 1);
        assert_eq!(report.reservations_applied, 1);
    }

    #[test]
    fn test_stub_customer_is_keyed_by_customer_name() {
        let input = raw(
            json!([{"name": "Hard Rock", "location": "Cancun", "rooms": [101]}]),
            json!([]),
            json!([{"hotel": "Hard Rock", "room": 101, "customer": "Kirk Hammett", "email": "KH@metallica.com", "location": "Cancun"}]),
        );

        let (catalog, _) = ReconciliationEngine::new().reconcile(&input);

        assert!(catalog.customer("Kirk Hammett").is_some());
        assert!(catalog.customer("Hard Rock").is_none());
    }

    #[test]
    fn test_hotels_first_wins() {
        let input = raw(
            json!([
                {"name": "Mirage", "location": "Las Vegas, NV", "rooms": [1, 2]},
                {"name": "Mirage", "location": "Reno, NV", "rooms": [3]}
            ]),
            json!([]),
            json!([]),
        );

        let (catalog, report) = ReconciliationEngine::new().reconcile(&input);

        assert_eq!(catalog.hotel("Mirage").unwrap().location(), "Las Vegas, NV");
        assert_eq!(report.hotels_loaded, 1);
        assert_eq!(
            report.skipped[0].reason,
            SkipReason::DuplicateHotel {
                name: "Mirage".to_string()
            }
        );
    }

    #[test]
    fn test_customers_last_wins() {
        let input = raw(
            json!([]),
            json!([
                {"name": "Eddie VH", "email": "evh@esp.com"},
                {"name": "Eddie VH", "email": "eddie@5150.com"}
            ]),
            json!([]),
        );

        let (catalog, report) = ReconciliationEngine::new().reconcile(&input);

        assert_eq!(catalog.customer("Eddie VH").unwrap().email(), "eddie@5150.com");
        assert_eq!(catalog.customers().len(), 1);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_invalid_rooms_skip_only_that_hotel() {
        let input = raw(
            json!([
                {"name": "Bad", "location": "X", "rooms": [101, "102"]},
                {"name": "Good", "location": "Y", "rooms": [201]}
            ]),
            json!([]),
            json!([]),
        );

        let (catalog, report) = ReconciliationEngine::new().reconcile(&input);

        assert!(catalog.hotel("Bad").is_none());
        assert!(catalog.hotel("Good").is_some());
        assert!(matches!(report.skipped[0].reason, SkipReason::InvalidRooms { .. }));
    }

    #[test]
    fn test_falsy_fields_are_skipped() {
        let input = raw(
            json!([
                {"name": "Empty", "location": "X", "rooms": []},
                {"name": "", "location": "X", "rooms": [1]},
                "not a hotel"
            ]),
            json!([{"name": "Nobody", "email": null}]),
            json!([{"hotel": "H", "room": 0, "customer": "C", "email": "e", "location": "L"}]),
        );

        let (catalog, report) = ReconciliationEngine::new().reconcile(&input);

        assert!(catalog.hotels().is_empty());
        assert!(catalog.customers().is_empty());
        assert_eq!(report.skipped_in(CollectionKind::Hotels), 3);
        assert_eq!(report.skipped_in(CollectionKind::Customers), 1);
        assert_eq!(report.skipped_in(CollectionKind::Reservations), 1);
        assert_eq!(report.skipped[2].reason, SkipReason::NotAnObject);
    }

    #[test]
    fn test_wrong_types_are_skipped() {
        let input = raw(
            json!([{"name": 42, "location": "X", "rooms": [1]}]),
            json!([]),
            json!([{"hotel": "H", "room": "101", "customer": "C", "email": "e", "location": "L"}]),
        );

        let (catalog, report) = ReconciliationEngine::new().reconcile(&input);

        assert!(catalog.hotels().is_empty());
        assert_eq!(
            report.skipped[0].reason,
            SkipReason::WrongType {
                field: "name".to_string()
            }
        );
        assert_eq!(
            report.skipped[1].reason,
            SkipReason::WrongType {
                field: "room".to_string()
            }
        );
    }

    #[test]
    fn test_reservation_adds_unknown_room() {
        let input = raw(
            json!([{"name": "Days Inn", "location": "Laredo, TX", "rooms": [101, 102]}]),
            json!([{"name": "John Cena", "email": "john@wwe.com"}]),
            json!([{"hotel": "Days Inn", "room": 303, "customer": "John Cena", "email": "john@wwe.com", "location": "Laredo, TX"}]),
        );

        let (catalog, report) = ReconciliationEngine::new().reconcile(&input);

        let hotel = catalog.hotel("Days Inn").unwrap();
        assert_eq!(hotel.available_rooms(), &[101, 102]);
        assert_eq!(hotel.reserved_to(303), Some("John Cena"));
        assert_eq!(report.rooms_added, 1);
        assert_eq!(report.stub_customers, 0);
    }

    #[test]
    fn test_double_booking_keeps_later_reservation() {
        let input = raw(
            json!([{"name": "Days Inn", "location": "Laredo, TX", "rooms": [101]}]),
            json!([]),
            json!([
                {"hotel": "Days Inn", "room": 101, "customer": "John Cena", "email": "john@wwe.com", "location": "Laredo, TX"},
                {"hotel": "Days Inn", "room": 101, "customer": "The Rock", "email": "rock@wwe.com", "location": "Laredo, TX"}
            ]),
        );

        let (catalog, report) = ReconciliationEngine::new().reconcile(&input);

        let hotel = catalog.hotel("Days Inn").unwrap();
        assert_eq!(hotel.reserved_to(101), Some("The Rock"));
        assert_eq!(hotel.all_rooms(), vec![101]);
        assert_eq!(report.overwritten, 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_clean_report() {
        let input = raw(
            json!([{"name": "Hard Rock", "location": "Cancun", "rooms": [101, 102]}]),
            json!([{"name": "Kirk Hammett", "email": "KH@metallica.com"}]),
            json!([{"hotel": "Hard Rock", "room": 101, "customer": "Kirk Hammett", "email": "KH@metallica.com", "location": "Cancun"}]),
        );

        let (_, report) = ReconciliationEngine::new().reconcile(&input);

        assert!(report.is_clean());
        assert_eq!(report.hotels_loaded, 1);
        assert_eq!(report.customers_loaded, 1);
        assert_eq!(report.reservations_applied, 1);
        println!("✅ {}", report.summary());
    }
}
