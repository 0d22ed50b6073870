//! Simulation driving, reporting, and error handling
//!
//! # Overview
//!
//! - **SimulationDriver**: owns the hotel resources and runs guests on a bounded worker set
//! - **ShutdownHandle**: stops a running simulation from another thread
//! - **SimulationReport**: aggregate counts and timings over the finished guests
//! - **SimulationError** / **GuestError**: run-level and per-guest failures
//! - **LoggingConfig**: tracing subscriber setup
//!
//! # Usage Example
//!
//! ```rust
//! use hotel_guest_simulator::simulation::*;
//! use hotel_guest_simulator::types::SimulationConfig;
//!
//! // Collapse every service time so the example runs instantly
//! let config = SimulationConfig { seed: Some(3), ..SimulationConfig::instantaneous(40) };
//!
//! let driver = SimulationDriver::new(config).unwrap();
//! let output = driver.run_population().unwrap();
//!
//! assert_eq!(output.report.completed + output.report.incomplete, 40);
//! println!("{}", output.report.render_summary());
//! ```

pub mod driver;
pub mod error;
pub mod logging;
pub mod statistics;

// Re-export all public types for convenience
pub use driver::*;
pub use error::*;
pub use logging::*;
pub use statistics::*;
