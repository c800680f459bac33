// 🏨 Hotel Entity - Room ledger + registry
//
// A hotel partitions its known room numbers into two disjoint groups:
// - available_rooms: free, in the order they were added
// - reservations:    room → customer name
//
// Every known room is in exactly one of the two.

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

use crate::error::{HotelError, RegistryError};
use crate::records::HotelRecord;

/// Room numbers are plain JSON integers
pub type RoomNumber = i64;

// ============================================================================
// ROOM LIST VALIDATION
// ============================================================================

/// Validate a loosely-typed room collection (JSON file, CLI argument).
///
/// Anything that is not an array of integers is rejected.
pub fn parse_room_list(value: &Value) -> Result<Vec<RoomNumber>, HotelError> {
    let items = value
        .as_array()
        .ok_or_else(|| HotelError::invalid_rooms(format!("expected a list, got {}", value)))?;

    let rooms = items
        .iter()
        .map(|item| {
            item.as_i64()
                .ok_or_else(|| HotelError::invalid_rooms(format!("{} is not an integer", item)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    ensure_distinct(&rooms)?;
    Ok(rooms)
}

fn ensure_distinct(rooms: &[RoomNumber]) -> Result<(), HotelError> {
    let mut seen = HashSet::with_capacity(rooms.len());
    for room in rooms {
        if !seen.insert(room) {
            return Err(HotelError::invalid_rooms(format!(
                "room {} is listed more than once",
                room
            )));
        }
    }
    Ok(())
}

// ============================================================================
// HOTEL UPDATE
// ============================================================================

/// Partial update: only the `Some` fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotelUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub rooms: Option<Vec<RoomNumber>>,
}

impl HotelUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        HotelUpdate {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_rooms(mut self, rooms: Vec<RoomNumber>) -> Self {
        self.rooms = Some(rooms);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.location.is_none() && self.rooms.is_none()
    }
}

// ============================================================================
// HOTEL ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotel {
    name: String,
    location: String,
    available_rooms: Vec<RoomNumber>,
    reservations: IndexMap<RoomNumber, String>,
}

impl Hotel {
    /// Create a hotel with every room available.
    ///
    /// Name, location and rooms must all be non-empty: the hotels file drops
    /// records with an empty field, so such a hotel would not survive a reload.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        rooms: Vec<RoomNumber>,
    ) -> Result<Self, HotelError> {
        let name = name.into();
        let location = location.into();
        if name.is_empty() {
            return Err(HotelError::EmptyField { field: "name" });
        }
        if location.is_empty() {
            return Err(HotelError::EmptyField { field: "location" });
        }
        if rooms.is_empty() {
            return Err(HotelError::invalid_rooms("at least one room is required"));
        }
        ensure_distinct(&rooms)?;

        Ok(Hotel {
            name,
            location,
            available_rooms: rooms,
            reservations: IndexMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn available_rooms(&self) -> &[RoomNumber] {
        &self.available_rooms
    }

    pub fn reservations(&self) -> &IndexMap<RoomNumber, String> {
        &self.reservations
    }

    /// Customer holding `room`, if it is reserved
    pub fn reserved_to(&self, room: RoomNumber) -> Option<&str> {
        self.reservations.get(&room).map(String::as_str)
    }

    pub fn is_available(&self, room: RoomNumber) -> bool {
        self.available_rooms.contains(&room)
    }

    pub fn has_room(&self, room: RoomNumber) -> bool {
        self.is_available(room) || self.reservations.contains_key(&room)
    }

    /// Available rooms first, then reserved ones. Callers should only rely on membership.
    pub fn all_rooms(&self) -> Vec<RoomNumber> {
        self.available_rooms
            .iter()
            .copied()
            .chain(self.reservations.keys().copied())
            .collect()
    }

    /// Add a single room. Returns false if the hotel already knows it.
    pub fn add_room(&mut self, room: RoomNumber) -> bool {
        if self.has_room(room) {
            return false;
        }
        self.available_rooms.push(room);
        true
    }

    /// Reserve an available room. Unknown or already-reserved rooms are left untouched.
    ///
    /// Room 0 and an empty customer name are refused: the reservations file
    /// cannot carry them.
    pub fn reserve_room(&mut self, customer: &str, room: RoomNumber) -> bool {
        if room == 0 || customer.is_empty() {
            warn!(hotel = %self.name, room, customer, "reservation needs a non-zero room and a customer name");
            return false;
        }
        match self.available_rooms.iter().position(|r| *r == room) {
            Some(idx) => {
                self.available_rooms.remove(idx);
                self.reservations.insert(room, customer.to_string());
                debug!(hotel = %self.name, room, customer, "room reserved");
                true
            }
            None => {
                warn!(hotel = %self.name, room, "room is not available");
                false
            }
        }
    }

    /// Cancel a reservation, only if `room` is held by exactly `customer`.
    pub fn cancel_reservation(&mut self, customer: &str, room: RoomNumber) -> bool {
        if self.reserved_to(room) != Some(customer) {
            warn!(hotel = %self.name, room, customer, "no such reservation found");
            return false;
        }

        self.reservations.shift_remove(&room);
        self.available_rooms.push(room);
        debug!(hotel = %self.name, room, customer, "reservation cancelled");
        true
    }

    /// Force `room` to be reserved to `customer`, adding the room if needed.
    ///
    /// Used when replaying the reservations file, where the file is the
    /// source of truth. Returns the previous holder if one was overwritten.
    pub fn assign_room(&mut self, customer: &str, room: RoomNumber) -> Option<String> {
        if let Some(idx) = self.available_rooms.iter().position(|r| *r == room) {
            self.available_rooms.remove(idx);
        }
        self.reservations.insert(room, customer.to_string())
    }

    /// Apply a partial update in the order name, location, rooms.
    ///
    /// Empty values leave the field as it is. Not atomic: when the new room
    /// list is rejected, the name and location changes have already been applied.
    pub fn modify_info(&mut self, update: HotelUpdate) -> Result<(), HotelError> {
        if let Some(name) = update.name.filter(|n| !n.is_empty()) {
            self.name = name;
        }
        if let Some(location) = update.location.filter(|l| !l.is_empty()) {
            self.location = location;
        }
        if let Some(rooms) = update.rooms.filter(|r| !r.is_empty()) {
            ensure_distinct(&rooms)?;
            // Reserved rooms stay reserved.
            self.available_rooms = rooms
                .into_iter()
                .filter(|room| !self.reservations.contains_key(room))
                .collect();
        }
        Ok(())
    }

    pub fn to_record(&self) -> HotelRecord {
        HotelRecord {
            name: self.name.clone(),
            location: self.location.clone(),
            rooms: self.all_rooms(),
        }
    }

    pub(crate) fn rename_holder(&mut self, old: &str, new: &str) -> usize {
        let mut renamed = 0;
        for holder in self.reservations.values_mut() {
            if holder == old {
                *holder = new.to_string();
                renamed += 1;
            }
        }
        renamed
    }
}

impl fmt::Display for Hotel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reserved: Vec<RoomNumber> = self.reservations.keys().copied().collect();
        writeln!(f, "Hotel Name: {}", self.name)?;
        writeln!(f, "Location: {}", self.location)?;
        writeln!(f, "Available Rooms: {:?}", self.available_rooms)?;
        write!(f, "Reserved Rooms: {:?}", reserved)
    }
}

// ============================================================================
// HOTEL REGISTRY
// ============================================================================

/// Hotels keyed by name, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct HotelRegistry {
    hotels: IndexMap<String, Hotel>,
}

impl HotelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hotel unless its name is taken. First registration wins.
    pub fn register(&mut self, hotel: Hotel) -> bool {
        if self.hotels.contains_key(hotel.name()) {
            return false;
        }
        self.hotels.insert(hotel.name().to_string(), hotel);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Hotel> {
        self.hotels.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Hotel> {
        self.hotels.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hotels.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Hotel> {
        self.hotels.shift_remove(name)
    }

    /// Apply `update` to a hotel and re-key it under its resulting name.
    ///
    /// A rename onto a name held by another hotel is refused before anything
    /// changes. The re-keyed hotel moves to the end of the registry. The
    /// returned inner result is the outcome of `Hotel::modify_info`; the
    /// re-key happens either way.
    pub fn update(
        &mut self,
        name: &str,
        update: HotelUpdate,
    ) -> Result<Result<(), HotelError>, RegistryError> {
        if !self.hotels.contains_key(name) {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        if let Some(new_name) = update.name.as_deref().filter(|n| !n.is_empty()) {
            if new_name != name && self.hotels.contains_key(new_name) {
                return Err(RegistryError::NameTaken(new_name.to_string()));
            }
        }

        let mut hotel = self
            .hotels
            .shift_remove(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        let outcome = hotel.modify_info(update);
        self.hotels.insert(hotel.name().to_string(), hotel);
        Ok(outcome)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hotel> {
        self.hotels.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Hotel> {
        self.hotels.values_mut()
    }

    pub fn names(&self) -> Vec<&str> {
        self.hotels.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.hotels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotels.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
