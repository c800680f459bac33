// Entity Models
//
// Each entity comes with the registry that owns it, keyed by name.
// Hotels carry the room ledger; customers are referenced from it by name only.

pub mod customer;
pub mod hotel;

pub use customer::{Customer, CustomerRegistry, CustomerUpdate};
pub use hotel::{parse_room_list, Hotel, HotelRegistry, HotelUpdate, RoomNumber};
