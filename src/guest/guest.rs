//! Core guest record and per-guest outcome
//!
//! A `Guest` is mutated only by the worker running its pipeline and is
//! read-only once the pipeline has finished.

use crate::simulation::{GuestError, IncompleteReason};
use crate::types::{Activity, GuestId, RoomCode, RoomServiceOrder, Stage};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One hotel guest
#[derive(Debug, Clone, PartialEq)]
pub struct Guest {
    /// Unique identifier for the guest
    pub id: GuestId,
    /// Position in the arrival order (1-based)
    pub number: usize,
    /// Display name
    pub name: String,
    /// Whether the guest arrives with luggage
    pub has_luggage: bool,
    /// Room assigned at check-in
    pub room: Option<RoomCode>,
    /// Time since simulation start when check-in finished
    pub check_in_time: Option<Duration>,
    /// Time since simulation start when checkout finished
    pub check_out_time: Option<Duration>,
    /// Activity the guest ended up doing
    pub activity: Option<Activity>,
    /// Time spent doing the activity
    pub activity_service_time: Duration,
    /// Activity selection draws made, including the successful one
    pub activity_attempts: usize,
    /// What was ordered, for room service
    pub room_service_order: Option<RoomServiceOrder>,
    /// Whether a bellhop carried the guest's luggage
    pub luggage_handled: bool,
    /// Furthest stage entered
    pub stage: Stage,
}

impl Guest {
    /// Create a guest who has not started their stay
    pub fn new(number: usize, name: impl Into<String>, has_luggage: bool) -> Self {
        Self {
            id: GuestId::new(),
            number,
            name: name.into(),
            has_luggage,
            room: None,
            check_in_time: None,
            check_out_time: None,
            activity: None,
            activity_service_time: Duration::ZERO,
            activity_attempts: 0,
            room_service_order: None,
            luggage_handled: false,
            stage: Stage::Reserving,
        }
    }

    /// Time between check-in and checkout, once both happened
    pub fn time_in_hotel(&self) -> Option<Duration> {
        match (self.check_in_time, self.check_out_time) {
            (Some(check_in), Some(check_out)) => check_out.checked_sub(check_in),
            _ => None,
        }
    }

    /// Whether the guest got as far as choosing an activity
    pub fn reached_activity_selection(&self) -> bool {
        self.stage >= Stage::ActivitySelection
    }
}

/// How a guest's pipeline ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuestOutcome {
    /// Reached `Done`
    Completed,
    /// Stopped early
    Incomplete {
        /// Stage the guest was in when it stopped
        stage: Stage,
        /// Classified cause
        reason: IncompleteReason,
        /// Human-readable detail
        detail: String,
    },
}

impl GuestOutcome {
    /// Build an incomplete outcome from the error that stopped the pipeline
    pub fn incomplete(stage: Stage, error: &GuestError) -> Self {
        GuestOutcome::Incomplete { stage, reason: error.reason(), detail: error.to_string() }
    }

    /// Whether the guest reached `Done`
    pub fn is_completed(&self) -> bool {
        matches!(self, GuestOutcome::Completed)
    }

    /// The incomplete reason, if any
    pub fn reason(&self) -> Option<IncompleteReason> {
        match self {
            GuestOutcome::Completed => None,
            GuestOutcome::Incomplete { reason, .. } => Some(*reason),
        }
    }
}

/// A finished guest and how their pipeline ended
#[derive(Debug, Clone, PartialEq)]
pub struct GuestResult {
    /// Final guest record
    pub guest: Guest,
    /// Completion status
    pub outcome: GuestOutcome,
}

/// Flat, serializable view of a finished guest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestRecord {
    /// Guest identifier
    pub id: GuestId,
    /// Display name
    pub name: String,
    /// Room code, formatted
    pub room: Option<String>,
    /// Whether the guest had luggage
    pub has_luggage: bool,
    /// Whether a bellhop handled it
    pub luggage_handled: bool,
    /// Activity done
    pub activity: Option<Activity>,
    /// Room service order, if any
    pub room_service_order: Option<RoomServiceOrder>,
    /// Activity selection draws made
    pub activity_attempts: usize,
    /// Seconds spent on the activity
    pub activity_service_time_secs: f64,
    /// Seconds since simulation start at check-in
    pub check_in_time_secs: Option<f64>,
    /// Seconds since simulation start at checkout
    pub check_out_time_secs: Option<f64>,
    /// Seconds between check-in and checkout
    pub time_in_hotel_secs: Option<f64>,
    /// Completion status
    pub outcome: GuestOutcome,
}

impl GuestRecord {
    /// Project a finished guest into its record
    pub fn from_result(result: &GuestResult) -> Self {
        let guest = &result.guest;
        Self {
            id: guest.id,
            name: guest.name.clone(),
            room: guest.room.map(|room| room.to_string()),
            has_luggage: guest.has_luggage,
            luggage_handled: guest.luggage_handled,
            activity: guest.activity,
            room_service_order: guest.room_service_order,
            activity_attempts: guest.activity_attempts,
            activity_service_time_secs: guest.activity_service_time.as_secs_f64(),
            check_in_time_secs: guest.check_in_time.map(|t| t.as_secs_f64()),
            check_out_time_secs: guest.check_out_time.map(|t| t.as_secs_f64()),
            time_in_hotel_secs: guest.time_in_hotel().map(|t| t.as_secs_f64()),
            outcome: result.outcome.clone(),
        }
    }
}
