//! Guests and the stage pipeline that moves them through the hotel
//!
//! # Overview
//!
//! - **Guest**: one guest's mutable record while the pipeline runs
//! - **GuestOutcome** / **GuestResult**: how a guest's run ended
//! - **GuestRecord**: flat, serializable projection for JSONL output
//! - **GuestGenerator**: creates the population, optionally from a seed
//! - **GuestPipeline**: the per-guest stage state machine
//!
//! # Usage Example
//!
//! ```rust
//! use hotel_guest_simulator::guest::*;
//! use hotel_guest_simulator::resources::HotelResources;
//! use hotel_guest_simulator::types::SimulationConfig;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use std::time::Instant;
//!
//! let config = SimulationConfig::instantaneous(2);
//! let resources = HotelResources::from_config(&config, &mut StdRng::seed_from_u64(7));
//!
//! let guests = GuestGenerator::with_seed(7).generate_guests(config.guest_count);
//! let mut pipeline =
//!     GuestPipeline::new(&resources, &config, Instant::now(), StdRng::seed_from_u64(7));
//!
//! for guest in guests {
//!     let result = pipeline.run(guest);
//!     assert!(result.outcome.is_completed());
//! }
//! ```

pub mod generator;
#[allow(clippy::module_inception)]
pub mod guest;
pub mod pipeline;

pub use generator::{GuestGenerator, LUGGAGE_PROBABILITY};
pub use guest::{Guest, GuestOutcome, GuestRecord, GuestResult};
pub use pipeline::GuestPipeline;
