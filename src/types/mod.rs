//! Core types and identifiers for the hotel simulator
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the simulation system.
//!
//! # Overview
//!
//! - **Identifiers**: UUID-based guest identifiers and floor/room codes
//! - **Enums**: Pipeline stages, activities, resource kinds, room service orders
//! - **Configuration**: Simulation configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use hotel_guest_simulator::types::*;
//!
//! let guest_id = GuestId::new();
//! let room = RoomCode::new(2, 7);
//! assert_eq!(room.to_string(), "207");
//!
//! let config = SimulationConfig {
//!     guest_count: 50,
//!     receptionist_capacity: 2,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
