//! Unique identifier types for the hotel simulator
//!
//! This module contains the UUID-based guest identifier and the floor/room
//! code used to key the room inventory.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a guest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuestId(pub Uuid);

impl GuestId {
    /// Create a new random guest ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GuestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GUEST_{}", self.0.simple())
    }
}

impl Serialize for GuestId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("GUEST_{}", self.0.simple()))
    }
}

impl<'de> Deserialize<'de> for GuestId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let raw = s.strip_prefix("GUEST_").unwrap_or(&s);
        let uuid = Uuid::parse_str(raw).map_err(serde::de::Error::custom)?;
        Ok(GuestId(uuid))
    }
}

/// Code of a physical room: floor number followed by a two-digit room number
///
/// Floor 1, room 0 is `"100"`; floor 3, room 10 is `"310"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomCode {
    /// Floor the room is on (1-based)
    pub floor: u32,
    /// Room number on the floor (0-based)
    pub number: u32,
}

impl RoomCode {
    /// Create a room code from a floor and room number
    pub fn new(floor: u32, number: u32) -> Self {
        Self { floor, number }
    }

    /// Build every room code for a hotel with the given shape, floor by floor
    pub fn layout(floors: u32, rooms_per_floor: u32) -> Vec<RoomCode> {
        (1..=floors)
            .flat_map(|floor| (0..rooms_per_floor).map(move |number| RoomCode::new(floor, number)))
            .collect()
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.floor, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_guest_id_creation() {
        let id1 = GuestId::new();
        let id2 = GuestId::new();
        assert_ne!(id1, id2);

        let id3 = GuestId::default();
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_guest_id_display() {
        let id = GuestId::new();
        let display_str = format!("{}", id);

        assert!(display_str.starts_with("GUEST_"));
        // GUEST_ + 32 hex chars
        assert_eq!(display_str.len(), 38);
    }

    #[test]
    fn test_guest_id_serialization() {
        let id = GuestId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert!(json.contains("GUEST_"));

        let back: GuestId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_guest_id_deserializes_raw_uuid() {
        let raw = Uuid::new_v4();
        let id: GuestId = serde_json::from_str(&format!("\"{}\"", raw)).unwrap();
        assert_eq!(id.0, raw);
    }

    #[test]
    fn test_room_code_display() {
        assert_eq!(RoomCode::new(1, 0).to_string(), "100");
        assert_eq!(RoomCode::new(2, 7).to_string(), "207");
        assert_eq!(RoomCode::new(3, 10).to_string(), "310");
    }

    #[test]
    fn test_room_layout_is_unique() {
        let layout = RoomCode::layout(3, 11);
        assert_eq!(layout.len(), 33);

        let unique: HashSet<_> = layout.iter().map(|c| c.to_string()).collect();
        assert_eq!(unique.len(), 33);
        assert_eq!(layout.first().copied(), Some(RoomCode::new(1, 0)));
        assert_eq!(layout.last().copied(), Some(RoomCode::new(3, 10)));
    }

    #[test]
    fn test_widest_accepted_layout_prints_unique_codes() {
        let layout = RoomCode::layout(11, 100);
        let unique: HashSet<_> = layout.iter().map(|c| c.to_string()).collect();
        assert_eq!(unique.len(), 1100);
        assert_eq!(RoomCode::new(1, 99).to_string(), "199");
        assert_eq!(RoomCode::new(11, 0).to_string(), "1100");
    }

    #[test]
    fn test_empty_layout() {
        assert!(RoomCode::layout(0, 11).is_empty());
        assert!(RoomCode::layout(3, 0).is_empty());
    }
}
