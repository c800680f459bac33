// 🗂️ Reservations - The catalog aggregate
//
// Owns both registries. Every mutation goes through here, loading goes
// through the reconciliation engine, saving goes through `flatten`.
//
// Customer deletion does not cancel reservations. A reservation whose
// customer is gone makes `flatten` (and so `save`) fail until it is
// cancelled; see `dangling_reservations`.

use tracing::{info, warn};

use crate::config::CatalogPaths;
use crate::entities::{
    Customer, CustomerRegistry, CustomerUpdate, Hotel, HotelRegistry, HotelUpdate, RoomNumber,
};
use crate::error::{CatalogError, HotelError, RegistryError, StoreError};
use crate::reconciliation::{LoadReport, ReconciliationEngine};
use crate::records::{Collections, RawCollections, ReservationRecord};
use crate::store;

/// A reservation that points at a customer missing from the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReservation {
    pub hotel: String,
    pub room: RoomNumber,
    pub customer: String,
}

#[derive(Debug, Clone, Default)]
pub struct Reservations {
    pub(crate) hotels: HotelRegistry,
    pub(crate) customers: CustomerRegistry,
}

impl Reservations {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // LOAD / SAVE
    // ========================================================================

    /// Rebuild a catalog from already-read collections.
    pub fn reconcile(raw: &RawCollections) -> (Self, LoadReport) {
        ReconciliationEngine::new().reconcile(raw)
    }

    /// Read the three files and reconcile them. Missing files count as empty.
    pub fn load(paths: &CatalogPaths) -> Result<(Self, LoadReport), StoreError> {
        let raw = store::load_collections(paths)?;
        Ok(Self::reconcile(&raw))
    }

    /// Flatten the catalog into the three persisted collections.
    pub fn flatten(&self) -> Result<Collections, CatalogError> {
        let mut collections = Collections::default();

        for hotel in self.hotels.iter() {
            collections.hotels.push(hotel.to_record());

            for (room, customer) in hotel.reservations() {
                let email = self
                    .customers
                    .get(customer)
                    .map(|c| c.email().to_string())
                    .ok_or_else(|| CatalogError::DanglingReservation {
                        hotel: hotel.name().to_string(),
                        room: *room,
                        customer: customer.clone(),
                    })?;

                collections.reservations.push(ReservationRecord {
                    hotel: hotel.name().to_string(),
                    location: hotel.location().to_string(),
                    room: *room,
                    customer: customer.clone(),
                    email,
                });
            }
        }

        collections.customers = self.customers.iter().map(Customer::to_record).collect();
        Ok(collections)
    }

    /// Flatten and write all three files (hotels, reservations, customers).
    ///
    /// Nothing is written if flattening fails. The writes themselves are not
    /// atomic across files.
    pub fn save(&self, paths: &CatalogPaths) -> anyhow::Result<()> {
        let collections = self.flatten()?;
        store::save_collections(paths, &collections)?;
        Ok(())
    }

    // ========================================================================
    // LOOKUPS
    // ========================================================================

    pub fn hotel(&self, name: &str) -> Option<&Hotel> {
        self.hotels.get(name)
    }

    pub fn customer(&self, name: &str) -> Option<&Customer> {
        self.customers.get(name)
    }

    pub fn hotels(&self) -> &HotelRegistry {
        &self.hotels
    }

    pub fn customers(&self) -> &CustomerRegistry {
        &self.customers
    }

    /// Reservations whose customer is no longer registered
    pub fn dangling_reservations(&self) -> Vec<DanglingReservation> {
        self.hotels
            .iter()
            .flat_map(|hotel| {
                hotel
                    .reservations()
                    .iter()
                    .filter(|(_, customer)| !self.customers.contains(customer))
                    .map(move |(room, customer)| DanglingReservation {
                        hotel: hotel.name().to_string(),
                        room: *room,
                        customer: customer.clone(),
                    })
            })
            .collect()
    }

    // ========================================================================
    // HOTELS
    // ========================================================================

    /// Create a hotel. `Ok(false)` if the name is already registered.
    pub fn create_hotel(
        &mut self,
        name: &str,
        location: &str,
        rooms: Vec<RoomNumber>,
    ) -> Result<bool, HotelError> {
        if self.hotels.contains(name) {
            warn!(hotel = name, "hotel already exists");
            return Ok(false);
        }
        let hotel = Hotel::new(name, location, rooms)?;
        Ok(self.hotels.register(hotel))
    }

    pub fn remove_hotel(&mut self, name: &str) -> bool {
        match self.hotels.remove(name) {
            Some(_) => {
                info!(hotel = name, "hotel removed");
                true
            }
            None => {
                warn!(hotel = name, "hotel does not exist");
                false
            }
        }
    }

    /// Modify a hotel and re-key it under its (possibly new) name.
    ///
    /// - `Ok(false)`: no such hotel
    /// - `Err(NameTaken)`: the new name belongs to another hotel, nothing changed
    /// - `Err(InvalidRooms)`: the room list was rejected, but the name and
    ///   location changes were applied and the hotel re-keyed
    pub fn edit_hotel(&mut self, name: &str, update: HotelUpdate) -> Result<bool, CatalogError> {
        match self.hotels.update(name, update) {
            Ok(Ok(())) => Ok(true),
            Ok(Err(err)) => {
                warn!(hotel = name, error = %err, "room list rejected");
                Err(err.into())
            }
            Err(RegistryError::NotFound(_)) => {
                warn!(hotel = name, "hotel not found");
                Ok(false)
            }
            Err(RegistryError::NameTaken(taken)) => Err(CatalogError::NameTaken(taken)),
        }
    }

    /// Reserve `room`, creating the hotel (with just that room) and the
    /// customer if either is missing.
    ///
    /// The customer is created even when the room turns out to be taken.
    /// Requests that could not be written back (room 0, an empty hotel or
    /// customer name, an empty location or email for a record that would have
    /// to be created) are refused before anything changes.
    pub fn reserve_room(
        &mut self,
        hotel_name: &str,
        location: &str,
        customer: &str,
        email: &str,
        room: RoomNumber,
    ) -> bool {
        if room == 0 || hotel_name.is_empty() || customer.is_empty() {
            warn!(hotel = hotel_name, room, customer, "reservation needs a hotel, a customer and a non-zero room");
            return false;
        }

        let new_hotel = !self.hotels.contains(hotel_name);
        let new_customer = !self.customers.contains(customer);
        if new_hotel && location.is_empty() {
            warn!(hotel = hotel_name, "cannot create a hotel without a location");
            return false;
        }
        if new_customer && email.is_empty() {
            warn!(customer, "cannot create a customer without an email");
            return false;
        }

        if new_hotel {
            if let Ok(hotel) = Hotel::new(hotel_name, location, vec![room]) {
                self.hotels.register(hotel);
                info!(hotel = hotel_name, room, "hotel created for reservation");
            }
        }

        let reserved = self
            .hotels
            .get_mut(hotel_name)
            .map(|hotel| hotel.reserve_room(customer, room))
            .unwrap_or(false);

        if new_customer {
            self.create_customer(customer, email);
        }

        reserved
    }

    pub fn cancel_reservation(&mut self, hotel_name: &str, room: RoomNumber, customer: &str) -> bool {
        match self.hotels.get_mut(hotel_name) {
            Some(hotel) => hotel.cancel_reservation(customer, room),
            None => {
                warn!(hotel = hotel_name, "hotel not found");
                false
            }
        }
    }

    // ========================================================================
    // CUSTOMERS
    // ========================================================================

    /// Register a new customer. Empty names or emails are refused.
    pub fn create_customer(&mut self, name: &str, email: &str) -> bool {
        if name.is_empty() || email.is_empty() {
            warn!(customer = name, email, "customer needs a name and an email");
            return false;
        }
        if !self.customers.register(Customer::new(name, email)) {
            warn!(customer = name, "customer already exists");
            return false;
        }
        true
    }

    /// Remove a customer. Their reservations are left in place.
    pub fn delete_customer(&mut self, name: &str) -> bool {
        if self.customers.remove(name).is_none() {
            warn!(customer = name, "customer does not exist");
            return false;
        }
        true
    }

    /// Modify a customer and re-key under the new name.
    ///
    /// A rename also updates the holder of that customer's reservations.
    pub fn modify_customer(&mut self, name: &str, update: CustomerUpdate) -> Result<bool, CatalogError> {
        let new_name = update.name.clone();

        match self.customers.update(name, update) {
            Ok(()) => {}
            Err(RegistryError::NotFound(_)) => {
                warn!(customer = name, "customer does not exist");
                return Ok(false);
            }
            Err(RegistryError::NameTaken(taken)) => return Err(CatalogError::NameTaken(taken)),
        }

        if let Some(new_name) = new_name.filter(|n| !n.is_empty() && n != name) {
            let moved: usize = self
                .hotels
                .iter_mut()
                .map(|hotel| hotel.rename_holder(name, &new_name))
                .sum();
            if moved > 0 {
                info!(from = name, to = %new_name, reservations = moved, "reservations moved to renamed customer");
            }
        }
        Ok(true)
    }
}

// ============================================================================
// TESTS
// ============================================================================
