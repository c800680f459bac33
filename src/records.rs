// Persisted record shapes
//
// The three files are flat, denormalized arrays. Writing goes through these
// typed records; reading goes through `RawCollections` because the files are
// hand-editable and anything may be in them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::RoomNumber;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelRecord {
    pub name: String,
    pub location: String,
    pub rooms: Vec<RoomNumber>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub hotel: String,
    pub location: String,
    pub room: RoomNumber,
    pub customer: String,
    pub email: String,
}

/// Output of the flattening projector: one vector per file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collections {
    pub hotels: Vec<HotelRecord>,
    pub customers: Vec<CustomerRecord>,
    pub reservations: Vec<ReservationRecord>,
}

impl Collections {
    /// Re-expose the typed records as loose JSON, the shape the reconciler reads.
    ///
    /// Every record is converted or the whole call fails.
    pub fn into_raw(self) -> Result<RawCollections, serde_json::Error> {
        fn to_values<T: Serialize>(records: Vec<T>) -> Result<Vec<Value>, serde_json::Error> {
            records.into_iter().map(serde_json::to_value).collect()
        }

        Ok(RawCollections {
            hotels: to_values(self.hotels)?,
            customers: to_values(self.customers)?,
            reservations: to_values(self.reservations)?,
        })
    }
}

/// Input of the reconciler: untyped records exactly as found on disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCollections {
    pub hotels: Vec<Value>,
    pub customers: Vec<Value>,
    pub reservations: Vec<Value>,
}

/// Which of the three files a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionKind {
    Hotels,
    Customers,
    Reservations,
}

impl CollectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Hotels => "hotels",
            CollectionKind::Customers => "customers",
            CollectionKind::Reservations => "reservations",
        }
    }
}

/// JSON truthiness: null, false, 0, "" and empty containers are all "unset".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// True when every named field of `record` is present and truthy.
pub fn has_fields(record: &Value, fields: &[&str]) -> bool {
    fields
        .iter()
        .all(|field| record.get(*field).map(is_truthy).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));

        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(101)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!("Cancun")));
        assert!(is_truthy(&json!([101])));
    }

    #[test]
    fn test_has_fields() {
        let record = json!({"name": "Hard Rock", "location": "", "rooms": [101]});

        assert!(has_fields(&record, &["name", "rooms"]));
        assert!(!has_fields(&record, &["name", "location"])); // empty string
        assert!(!has_fields(&record, &["email"])); // missing
        assert!(!has_fields(&json!([1, 2]), &["name"])); // not an object
    }

    #[test]
    fn test_into_raw_keeps_field_names() {
        let collections = Collections {
            hotels: vec![],
            customers: vec![],
            reservations: vec![ReservationRecord {
                hotel: "HardRock".to_string(),
                location: "Tokyo, JP".to_string(),
                room: 101,
                customer: "Uri Petrovsky".to_string(),
                email: "uri@fox.com".to_string(),
            }],
        };

        let raw = collections.into_raw().unwrap();
        assert_eq!(raw.reservations.len(), 1);
        assert_eq!(raw.reservations[0]["hotel"], "HardRock");
        assert_eq!(raw.reservations[0]["room"], 101);
    }

    #[test]
    fn test_into_raw_converts_every_record() {
        let collections = Collections {
            hotels: vec![
                HotelRecord {
                    name: "Zero".to_string(),
                    location: "Queretaro".to_string(),
                    rooms: vec![0, -3, i64::MAX],
                },
                HotelRecord {
                    name: "Mirage".to_string(),
                    location: "Las Vegas, NV".to_string(),
                    rooms: (1..=50).collect(),
                },
            ],
            customers: vec![
                CustomerRecord {
                    name: "Johnny Cash".to_string(),
                    email: "john@cash.com".to_string(),
                },
                CustomerRecord {
                    name: "June Carter".to_string(),
                    email: "june@cash.com".to_string(),
                },
            ],
            reservations: vec![],
        };

        let raw = collections.clone().into_raw().unwrap();

        assert_eq!(raw.hotels.len(), collections.hotels.len());
        assert_eq!(raw.customers.len(), collections.customers.len());
        assert_eq!(raw.hotels[0]["rooms"], json!([0, -3, i64::MAX]));
        assert_eq!(raw.hotels[1]["rooms"].as_array().unwrap().len(), 50);
    }
}
