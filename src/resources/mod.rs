//! Shared, capacity-limited hotel resources
//!
//! - **ResourcePool**: counting semaphore for staff and seats
//! - **RoomInventory**: exclusive checkout/return of uniquely coded rooms
//! - **ShutdownSignal**: one-way latch that cuts service-time holds short
//! - **HotelResources**: everything above for one run, built from the config
//!
//! All mutation happens under each primitive's own lock. No primitive ever
//! takes another primitive's lock, so no lock ordering exists to violate.

pub mod hotel;
pub mod inventory;
pub mod pool;
pub mod shutdown;

pub use hotel::*;
pub use inventory::*;
pub use pool::*;
pub use shutdown::*;
