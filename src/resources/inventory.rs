//! Room inventory
//!
//! A finite set of uniquely coded rooms. Every code is at any instant either
//! available or assigned to exactly one guest.

use crate::types::{GuestId, RoomCode};
use parking_lot::{Condvar, Mutex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, VecDeque};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors returned by the room inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Inventory closed with no room left for the waiting guest
    #[error("room inventory is closed and exhausted")]
    Exhausted,

    /// Inventory closed while rooms remain; no new check-ins are accepted
    #[error("room inventory is closed")]
    Closed,

    /// Returned a room that is not assigned to the returning guest
    #[error("room {room} is not assigned to {guest}")]
    InvalidRelease {
        /// Room that was returned
        room: RoomCode,
        /// Guest that returned it
        guest: GuestId,
    },

    /// The code does not belong to this hotel
    #[error("room {0} does not exist")]
    UnknownRoom(RoomCode),
}

#[derive(Debug)]
struct InventoryState {
    available: VecDeque<RoomCode>,
    assigned: HashMap<RoomCode, GuestId>,
    peak_assigned: usize,
    closed: bool,
}

/// Exclusive checkout/return of a fixed set of rooms
#[derive(Debug)]
pub struct RoomInventory {
    rooms: BTreeSet<RoomCode>,
    state: Mutex<InventoryState>,
    returned: Condvar,
}

/// Partition of the inventory at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Rooms free to hand out
    pub available: Vec<RoomCode>,
    /// Rooms currently held, with their holder
    pub assigned: Vec<(RoomCode, GuestId)>,
}

impl InventorySnapshot {
    /// Whether available and assigned rooms are disjoint and together equal `rooms`
    pub fn is_partition_of(&self, rooms: &BTreeSet<RoomCode>) -> bool {
        let available: BTreeSet<_> = self.available.iter().copied().collect();
        let assigned: BTreeSet<_> = self.assigned.iter().map(|(room, _)| *room).collect();

        available.len() == self.available.len()
            && assigned.len() == self.assigned.len()
            && available.is_disjoint(&assigned)
            && available.union(&assigned).copied().collect::<BTreeSet<_>>() == *rooms
    }
}

impl RoomInventory {
    /// Create an inventory handing rooms out in the given order
    ///
    /// Duplicate codes are collapsed.
    pub fn new(codes: Vec<RoomCode>) -> Self {
        let mut seen = BTreeSet::new();
        let available: VecDeque<_> = codes.into_iter().filter(|code| seen.insert(*code)).collect();

        Self {
            rooms: seen,
            state: Mutex::new(InventoryState {
                available,
                assigned: HashMap::new(),
                peak_assigned: 0,
                closed: false,
            }),
            returned: Condvar::new(),
        }
    }

    /// Build the floor/room layout and shuffle the hand-out order
    pub fn with_layout<R: Rng>(floors: u32, rooms_per_floor: u32, rng: &mut R) -> Self {
        let mut codes = RoomCode::layout(floors, rooms_per_floor);
        codes.shuffle(rng);
        Self::new(codes)
    }

    /// Block until a room is free, then assign it to `guest`
    pub fn take(&self, guest: GuestId) -> Result<RoomCode, InventoryError> {
        let mut state = self.state.lock();
        while !state.closed && state.available.is_empty() {
            debug!(%guest, "No rooms available, waiting for a checkout");
            self.returned.wait(&mut state);
        }
        if state.closed {
            return Err(if state.available.is_empty() {
                InventoryError::Exhausted
            } else {
                InventoryError::Closed
            });
        }

        let Some(room) = state.available.pop_front() else {
            return Err(InventoryError::Exhausted);
        };
        state.assigned.insert(room, guest);
        state.peak_assigned = state.peak_assigned.max(state.assigned.len());
        Ok(room)
    }

    /// Take a room and wrap it in a key that returns it when dropped
    pub fn check_out_key(&self, guest: GuestId) -> Result<RoomKey<'_>, InventoryError> {
        let room = self.take(guest)?;
        Ok(RoomKey { inventory: self, room, guest, returned: false })
    }

    /// Return a room held by `guest` to the available set
    pub fn give_back(&self, room: RoomCode, guest: GuestId) -> Result<(), InventoryError> {
        if !self.rooms.contains(&room) {
            return Err(InventoryError::UnknownRoom(room));
        }

        let mut state = self.state.lock();
        match state.assigned.get(&room) {
            Some(holder) if *holder == guest => {
                state.assigned.remove(&room);
                state.available.push_back(room);
            }
            _ => {
                warn!(%room, %guest, "Rejected return of a room the guest does not hold");
                return Err(InventoryError::InvalidRelease { room, guest });
            }
        }
        drop(state);
        self.returned.notify_one();
        Ok(())
    }

    /// Close the inventory and wake every waiting guest
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        drop(state);
        self.returned.notify_all();
    }

    /// Every room code in the hotel
    pub fn rooms(&self) -> &BTreeSet<RoomCode> {
        &self.rooms
    }

    /// Total number of rooms
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether the hotel has no rooms at all
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Rooms free right now
    pub fn available_count(&self) -> usize {
        self.state.lock().available.len()
    }

    /// Rooms assigned right now
    pub fn assigned_count(&self) -> usize {
        self.state.lock().assigned.len()
    }

    /// Highest number of rooms ever assigned at once
    pub fn peak_assigned(&self) -> usize {
        self.state.lock().peak_assigned
    }

    /// Guest currently holding `room`, if any
    pub fn holder_of(&self, room: RoomCode) -> Option<GuestId> {
        self.state.lock().assigned.get(&room).copied()
    }

    /// Whether the inventory has been closed
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Consistent view of the available/assigned partition
    pub fn snapshot(&self) -> InventorySnapshot {
        let state = self.state.lock();
        let mut assigned: Vec<_> = state.assigned.iter().map(|(room, guest)| (*room, *guest)).collect();
        assigned.sort_by_key(|(room, _)| *room);
        InventorySnapshot { available: state.available.iter().copied().collect(), assigned }
    }
}

/// A room held by one guest; returned to the inventory on drop
#[derive(Debug)]
#[must_use = "dropping a room key returns the room immediately"]
pub struct RoomKey<'a> {
    inventory: &'a RoomInventory,
    room: RoomCode,
    guest: GuestId,
    returned: bool,
}

impl RoomKey<'_> {
    /// The room this key opens
    pub fn room(&self) -> RoomCode {
        self.room
    }

    /// Hand the room back explicitly, surfacing any inventory error
    pub fn give_back(mut self) -> Result<(), InventoryError> {
        self.returned = true;
        self.inventory.give_back(self.room, self.guest)
    }
}

impl Drop for RoomKey<'_> {
    fn drop(&mut self) {
        if !self.returned {
            if let Err(e) = self.inventory.give_back(self.room, self.guest) {
                warn!(room = %self.room, guest = %self.guest, "Room key dropped but return failed: {}", e);
            }
        }
    }
}
