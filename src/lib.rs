//! Hotel Guest Simulator
//!
//! A concurrent simulation of hotel guests flowing through a capacity-gated,
//! multi-stage service pipeline: reservation, check-in, luggage handling,
//! an activity, and checkout.
//!
//! # Overview
//!
//! Every guest runs as an independent execution that contends for shared,
//! capacity-limited resources: receptionists, bellhops, housekeepers, bar
//! seats, restaurant seats, and a finite inventory of uniquely coded rooms.
//! The correctness criteria are the capacity invariants and the absence of
//! resource corruption, not throughput.
//!
//! ## Key Features
//!
//! - **Counting-semaphore pools**: admission in a short critical section,
//!   service time spent outside any lock
//! - **Room inventory**: exclusive take/return with rooms handed back at checkout
//! - **Non-blocking activity selection**: saturated activities are re-rolled
//!   up to a bounded number of attempts
//! - **Bounded workers**: a configurable number of threads drains the guest queue
//! - **Prompt shutdown**: closing the hotel wakes every waiter and every hold
//! - **Reports**: per-activity totals, time in hotel, and pool peaks as text or JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use hotel_guest_simulator::*;
//!
//! let config = SimulationConfig {
//!     guest_count: 20,
//!     time_scale: 0.0,
//!     seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let driver = SimulationDriver::new(config)?;
//! let output = driver.run_population()?;
//!
//! println!("{} of {} guests completed", output.report.completed, output.report.guest_count);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Identifiers, enums, and configuration
//! - [`resources`]: Resource pools, room inventory, and the shutdown latch
//! - [`guest`]: Guest records, generation, and the per-guest stage pipeline
//! - [`simulation`]: Driver, report aggregation, errors, and logging
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Types     │    │  Resources  │    │    Guest    │
//! │             │    │             │    │             │
//! │ Identifiers │◄───┤ Pools       │◄───┤ Generator   │
//! │ Enums       │    │ Rooms       │    │ Pipeline    │
//! │ Config      │    │ Shutdown    │    │ Outcomes    │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!                            ▲                   ▲
//!                            │                   │
//!                    ┌───────┴───────────────────┴─┐
//!                    │         Simulation          │
//!                    │                             │
//!                    │ Driver     Report   Logging │
//!                    └─────────────────────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod guest;
pub mod resources;
pub mod simulation;
pub mod types;

// Core types and identifiers
pub use types::{
    Activity, ConfigValidationError, DurationRange, GuestId, ResourceKind, RoomCode,
    RoomServiceOrder, SimulationConfig, Stage,
};

// Shared resources
pub use resources::{HotelResources, Permit, PoolError, ResourcePool, RoomInventory, RoomKey};

// Guests
pub use guest::{Guest, GuestGenerator, GuestOutcome, GuestPipeline, GuestRecord, GuestResult};

// Simulation types and functionality
pub use simulation::{
    GuestError, IncompleteReason, LoggingConfig, ShutdownHandle, SimulationDriver,
    SimulationError, SimulationOutput, SimulationReport,
};
