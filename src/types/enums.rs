//! Enumeration types for the hotel simulator
//!
//! This module contains the pipeline stages, the guest activities, the shared
//! resource kinds, and room service orders.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered stages of a guest's stay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    /// Making the reservation at the front desk
    Reserving,
    /// Checking in and receiving a room
    CheckingIn,
    /// Bellhop carrying the luggage up
    LuggageHandling,
    /// Choosing and doing an activity
    ActivitySelection,
    /// Leaving the hotel and returning the room
    CheckingOut,
    /// Pipeline finished
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Reserving => write!(f, "Reserving"),
            Stage::CheckingIn => write!(f, "Checking In"),
            Stage::LuggageHandling => write!(f, "Luggage Handling"),
            Stage::ActivitySelection => write!(f, "Activity Selection"),
            Stage::CheckingOut => write!(f, "Checking Out"),
            Stage::Done => write!(f, "Done"),
        }
    }
}

/// Activities a guest can pick during their stay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Activity {
    /// Eating at the restaurant
    Restaurant,
    /// Drinking at the bar
    Bar,
    /// Ordering room service from a housekeeper
    RoomService,
    /// Requesting housekeeping
    Housekeeping,
}

impl Activity {
    /// Every activity, in the order they are drawn from
    pub const ALL: [Activity; 4] =
        [Activity::Restaurant, Activity::Bar, Activity::RoomService, Activity::Housekeeping];

    /// The shared resource this activity occupies
    pub fn resource(self) -> ResourceKind {
        match self {
            Activity::Restaurant => ResourceKind::RestaurantSeat,
            Activity::Bar => ResourceKind::BarSeat,
            Activity::RoomService | Activity::Housekeeping => ResourceKind::Housekeeper,
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activity::Restaurant => write!(f, "Restaurant"),
            Activity::Bar => write!(f, "Bar"),
            Activity::RoomService => write!(f, "Room Service"),
            Activity::Housekeeping => write!(f, "Housekeeping"),
        }
    }
}

/// Kinds of shared, capacity-limited resources in the hotel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Front desk staff
    Receptionist,
    /// Luggage porters
    Bellhop,
    /// Room service and housekeeping staff
    Housekeeper,
    /// Seats at the bar
    BarSeat,
    /// Seats at the restaurant
    RestaurantSeat,
}

impl ResourceKind {
    /// Every resource kind
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Receptionist,
        ResourceKind::Bellhop,
        ResourceKind::Housekeeper,
        ResourceKind::BarSeat,
        ResourceKind::RestaurantSeat,
    ];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Receptionist => write!(f, "Receptionist"),
            ResourceKind::Bellhop => write!(f, "Bellhop"),
            ResourceKind::Housekeeper => write!(f, "Housekeeper"),
            ResourceKind::BarSeat => write!(f, "Bar Seat"),
            ResourceKind::RestaurantSeat => write!(f, "Restaurant Seat"),
        }
    }
}

/// What a guest orders when they pick room service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomServiceOrder {
    /// Breakfast brought up to the room
    Breakfast,
    /// Extra cleaning
    Cleaning,
    /// Laundry pickup
    Laundry,
}

impl RoomServiceOrder {
    /// Every order kind
    pub const ALL: [RoomServiceOrder; 3] =
        [RoomServiceOrder::Breakfast, RoomServiceOrder::Cleaning, RoomServiceOrder::Laundry];
}

impl fmt::Display for RoomServiceOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomServiceOrder::Breakfast => write!(f, "breakfast"),
            RoomServiceOrder::Cleaning => write!(f, "cleaning"),
            RoomServiceOrder::Laundry => write!(f, "laundry"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_resources() {
        assert_eq!(Activity::Restaurant.resource(), ResourceKind::RestaurantSeat);
        assert_eq!(Activity::Bar.resource(), ResourceKind::BarSeat);
        assert_eq!(Activity::RoomService.resource(), ResourceKind::Housekeeper);
        assert_eq!(Activity::Housekeeping.resource(), ResourceKind::Housekeeper);
    }

    #[test]
    fn test_display_is_not_empty() {
        for activity in Activity::ALL {
            assert!(!activity.to_string().is_empty());
        }
        for kind in ResourceKind::ALL {
            assert!(!kind.to_string().is_empty());
        }
        for order in RoomServiceOrder::ALL {
            assert!(!order.to_string().is_empty());
        }
    }
}
