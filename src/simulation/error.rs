//! Error types and handling
//!
//! Driver-level failures live in [`SimulationError`]; anything that goes wrong
//! inside one guest's pipeline is a [`GuestError`] and never leaves that guest.

use crate::resources::{InventoryError, Interrupted, PoolError};
use crate::types::{ConfigValidationError, RoomCode, Stage};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can abort a whole simulation run
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ConfigurationError(#[from] ConfigValidationError),

    /// A worker thread could not be spawned
    #[error("Failed to spawn worker: {0}")]
    WorkerSpawnError(String),

    /// A worker thread panicked
    #[error("Worker panicked: {0}")]
    WorkerPanic(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl SimulationError {
    /// Create a worker panic error from a join payload
    pub fn worker_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        Self::WorkerPanic(message)
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimulationError::ConfigurationError(_) => false,
            SimulationError::WorkerSpawnError(_) => false,
            SimulationError::WorkerPanic(_) => false,
            SimulationError::IoError(_) => true,
            SimulationError::SerializationError(_) => true,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::WorkerSpawnError(_) => "Worker Spawn",
            SimulationError::WorkerPanic(_) => "Worker Panic",
            SimulationError::IoError(_) => "IO",
            SimulationError::SerializationError(_) => "Serialization",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Errors that end a single guest's pipeline early
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuestError {
    /// A pool, the inventory, or a service hold was shut down under the guest
    #[error("shut down while {stage}")]
    Shutdown {
        /// Stage the guest was in
        stage: Stage,
    },

    /// Inventory closed with no room left for the guest
    #[error("room inventory exhausted")]
    Exhausted,

    /// Returned a room the guest did not hold
    #[error("invalid release of room {room}")]
    InvalidRelease {
        /// Room involved
        room: RoomCode,
    },

    /// No activity could be joined within the retry bound
    #[error("no activity available after {attempts} attempts")]
    RetryBudgetExceeded {
        /// Attempts made
        attempts: usize,
    },
}

impl GuestError {
    /// Build the error for a pool that was closed during `stage`
    pub fn from_pool(error: PoolError, stage: Stage) -> Self {
        match error {
            PoolError::Shutdown(_) => GuestError::Shutdown { stage },
        }
    }

    /// Build the error for an interrupted service hold during `stage`
    pub fn interrupted(_: Interrupted, stage: Stage) -> Self {
        GuestError::Shutdown { stage }
    }

    /// Build the error for an inventory failure during `stage`
    pub fn from_inventory(error: InventoryError, stage: Stage) -> Self {
        match error {
            InventoryError::Exhausted => GuestError::Exhausted,
            InventoryError::Closed => GuestError::Shutdown { stage },
            InventoryError::InvalidRelease { room, .. } | InventoryError::UnknownRoom(room) => {
                GuestError::InvalidRelease { room }
            }
        }
    }

    /// Whether the error indicates a programming mistake rather than shutdown or saturation
    pub fn is_programming_error(&self) -> bool {
        matches!(self, GuestError::InvalidRelease { .. })
    }

    /// The reason recorded on the guest's outcome
    pub fn reason(&self) -> IncompleteReason {
        match self {
            GuestError::Shutdown { .. } => IncompleteReason::Shutdown,
            GuestError::Exhausted => IncompleteReason::Exhausted,
            GuestError::InvalidRelease { .. } => IncompleteReason::InvalidRelease,
            GuestError::RetryBudgetExceeded { .. } => IncompleteReason::RetryBudgetExceeded,
        }
    }
}

/// Why a guest did not reach `Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IncompleteReason {
    /// Shut down while waiting or being served
    Shutdown,
    /// No room could ever be assigned
    Exhausted,
    /// Room returned incorrectly
    InvalidRelease,
    /// Activity selection ran out of attempts
    RetryBudgetExceeded,
}

impl fmt::Display for IncompleteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncompleteReason::Shutdown => write!(f, "Shutdown"),
            IncompleteReason::Exhausted => write!(f, "Exhausted"),
            IncompleteReason::InvalidRelease => write!(f, "Invalid Release"),
            IncompleteReason::RetryBudgetExceeded => write!(f, "Retry Budget Exceeded"),
        }
    }
}
